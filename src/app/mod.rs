pub mod app;
pub mod state;

pub use app::App;
pub use state::{Repositories, Services};
