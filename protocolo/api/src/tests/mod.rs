mod api;
mod utils;
