pub mod types;
pub mod color;
pub mod grid;
pub mod map;
pub mod primitive;
pub mod stage;
pub mod render;
pub mod gpu_grid;
pub mod camera;
pub mod clock;
pub mod settings;
pub mod application;

const SQRT_3: f64 = 1.7320508075688772935274463415058723669428052538103806280558069794;
const INV_SQRT_3: f64 = 0.5773502691896257645091487805019574556476017512701268760186023264;
