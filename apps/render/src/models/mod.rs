pub mod resume;

pub use resume::{Contact, EducationEntry, ExperienceEntry, ResumeDocContent, Skills};
