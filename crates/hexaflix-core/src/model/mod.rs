mod movie;
mod session;

pub use movie::*;
pub use session::*;
