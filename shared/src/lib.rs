mod env;
mod errors;
mod logging;

pub use env::load_dotenv;
pub use errors::SharedError;
pub use logging::{LogFormat, init_logging, init_test_logging};
