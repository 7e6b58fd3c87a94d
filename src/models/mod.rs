pub mod enums;
pub mod food;
pub mod symptom;

pub use enums::*;
pub use food::*;
pub use symptom::*;
