mod arena;
mod boost_pad;
mod math;
mod settings;
mod sides;
mod vehicle_id;
mod world;

pub use arena::*;
pub use boost_pad::*;
pub use math::*;
pub use settings::*;
pub use sides::*;
pub use vehicle_id::*;
pub use world::*;

pub type Vector2 = nalgebra::Vector2<f64>;
pub type Vector3 = nalgebra::Vector3<f64>;
