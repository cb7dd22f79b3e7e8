pub mod localized;
pub mod model;
pub mod nullable;
pub mod schema;
pub mod tags;

pub use localized::*;
pub use model::*;
pub use nullable::Nullable;
pub use schema::*;
pub use tags::*;
