/// runnable heat conduction scenarios: cooling rod, dynamic rod, anisotropic and dynamic
/// plates, cuboid in a furnace, JSON task file
pub mod heat_examples;
