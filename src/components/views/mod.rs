mod home;
mod join_team;
mod set_fielding;

pub use home::Home;
pub use join_team::JoinTeam;
pub use set_fielding::SetFielding;
