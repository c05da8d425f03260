//! Persisted key layout shared by every subsystem.
//!
//! These strings are part of the saved-data format; renaming one orphans
//! previously stored values.

pub const PROFILE_POINTS: &str = "profilePoints";
pub const PROFILE_LEVEL: &str = "profileLevel";
pub const PROFILE_CURRENT_EXP: &str = "profileCurrentExp";
pub const PROFILE_CHECK_IN_DAYS: &str = "profileCheckInDays";
pub const LAST_CHECK_IN_DATE: &str = "lastCheckInDate";
pub const PROFILE_COMPLETED_TASKS: &str = "profileCompletedTasks";
pub const PROFILE_EXPERIENCE_SHARE_TIMES: &str = "profileExperienceShareTimes";
pub const PROFILE_PROPOSAL_TIMES: &str = "profileProposalTimes";
pub const PROFILE_NAME: &str = "profileName";
pub const NAME_CARDS: &str = "nameCards";
pub const USER_BADGES: &str = "userBadges";
pub const WATERING_COUNT: &str = "wateringCount";
pub const FERTILIZING_COUNT: &str = "fertilizingCount";
pub const WEEDING_COUNT: &str = "weedingCount";
pub const GIFT_COUNT: &str = "giftCount";
pub const ADOPTED_PLOTS_COUNT: &str = "adoptedPlotsCount";
pub const TOTAL_RECHARGE: &str = "totalRecharge";
pub const DISCOVERED_SPECIES_DATA: &str = "discoveredSpeciesData";
