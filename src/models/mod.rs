pub mod facility;
pub mod history;
pub mod user;

pub use facility::{Facility, FacilityType, FacilityUpdate, NewFacility, format_distance};
pub use history::{HistoryItem, NewSearchHistory, SearchHistoryEntry};
pub use user::{NewUser, User};
