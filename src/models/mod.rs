pub mod candidate;
pub mod event;
pub mod response;
pub mod verdict;

pub use candidate::*;
pub use event::*;
pub use response::*;
pub use verdict::*;
