pub mod clock;
pub mod dates;
pub mod errors;
pub mod token;
