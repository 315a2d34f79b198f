use goap_core::WorldState;

/// Raw scalar signal used to rank goals.
pub trait Consideration: 'static {
    fn consider(&mut self, world: &WorldState) -> f32;
}

impl<F> Consideration for F
where
    F: FnMut(&WorldState) -> f32 + 'static,
{
    fn consider(&mut self, world: &WorldState) -> f32 {
        self(world)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constant(pub f32);

impl Consideration for Constant {
    fn consider(&mut self, _world: &WorldState) -> f32 {
        self.0
    }
}
