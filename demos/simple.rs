use pointree::prelude::*;

fn main() -> Result<(), TreeError> {
    let mut tree: Octree<f32, DummyCell> = Octree::builder(TVec3::zero(), 16.0)
        .min_node_size(4.0)
        .auto_reduction(true)
        .build()?;

    let c1 = DummyCell::new("first", TVec3::splat(1.0));
    let c2 = DummyCell::new("second", TVec3::splat(15.0));

    assert!(tree.insert(c1.clone()));
    assert!(tree.insert(c2.clone()));

    let volume = Aabb::cube(TVec3::splat(1.0), 2.0)?;
    assert_eq!(tree.points_within_box(&volume), vec![c1.clone()]);
    assert_eq!(
        tree.points_within_sphere(TVec3::splat(14.0), 2.0),
        vec![c2.clone()]
    );

    let stats = tree.stats();
    println!("{} and {}: {stats:?}", c1.name, c2.name);

    assert!(tree.remove(&c1));
    assert!(tree.remove(&c2));
    assert_eq!(tree.root_node().state(), NodeState::Empty);
    Ok(())
}

#[derive(Debug, Clone, PartialEq)]
struct DummyCell {
    name: &'static str,
    position: TVec3<f32>,
}

impl Position for DummyCell {
    type F = f32;
    fn position(&self) -> TVec3<f32> {
        self.position
    }
}

impl DummyCell {
    fn new(name: &'static str, position: TVec3<f32>) -> Self {
        DummyCell { name, position }
    }
}
