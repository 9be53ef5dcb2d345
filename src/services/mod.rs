pub mod providers;
pub mod reconcile;
pub mod state;
pub mod view_filter;
pub mod watchlist;

pub use providers::{MovieDirectory, MovieStore};
pub use reconcile::{reconcile, ReconcileTrigger};
pub use state::{Action, Effect, ViewState, WatchlistState};
pub use view_filter::compute_view;
pub use watchlist::Watchlist;
