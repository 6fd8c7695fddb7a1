pub mod arc_swap_session_store;

pub use arc_swap_session_store::ArcSwapSessionStore;
