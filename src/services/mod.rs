pub mod nws;
pub mod weather;
