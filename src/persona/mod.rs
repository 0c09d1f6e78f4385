pub mod photo;
pub mod reference;
pub mod survey;

pub use photo::UserPhoto;
pub use reference::ReferenceSet;
pub use survey::{Consent, EnergyPreference, SurveyResponse, TravelStyle};
