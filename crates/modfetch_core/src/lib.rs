pub mod error;
pub mod generator;
pub mod manifest;
pub mod resolver;
pub mod traits;
pub mod version;

pub mod prelude {
    pub use super::error::*;
    pub use super::generator::*;
    pub use super::manifest::*;
    pub use super::resolver::*;
    pub use super::traits::*;
    pub use super::version::*;
}
