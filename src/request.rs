pub mod campaigns;
pub mod characters;
pub mod updates;
pub mod users;
