// Data models for project and part tracking
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Longest name accepted for a project, part or counter
pub const NAME_MAX_LENGTH: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Name cannot be blank")]
    NameBlank,
    #[error("Name cannot be longer than {max} characters")]
    NameTooLong { max: usize },
}

pub type ValidationResult<T> = Result<T, ValidationError>;

/// Check a name against the blank and length rules shared by every entity
pub fn validate_name(name: &str) -> ValidationResult<()> {
    if name.trim().is_empty() {
        return Err(ValidationError::NameBlank);
    }
    if name.chars().count() > NAME_MAX_LENGTH {
        return Err(ValidationError::NameTooLong {
            max: NAME_MAX_LENGTH,
        });
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectType {
    #[default]
    Knitting,
    Crochet,
    Machine,
    Loom,
    Other,
}

impl ProjectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectType::Knitting => "knitting",
            ProjectType::Crochet => "crochet",
            ProjectType::Machine => "machine",
            ProjectType::Loom => "loom",
            ProjectType::Other => "other",
        }
    }

    pub fn from_string(s: &str) -> Self {
        match s {
            "knitting" => ProjectType::Knitting,
            "crochet" => ProjectType::Crochet,
            "machine" => ProjectType::Machine,
            "loom" => ProjectType::Loom,
            "other" => ProjectType::Other,
            _ => ProjectType::Knitting,
        }
    }
}

/// Kind of counter attached to a part.
///
/// A part has at most one `Global` and one `Stitch` counter and neither can be
/// deleted by the user. `Normal` counters are user-deletable and may be linked
/// to the part's `Global` counter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CounterType {
    Global,
    Stitch,
    #[default]
    Normal,
}

impl CounterType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CounterType::Global => "global",
            CounterType::Stitch => "stitch",
            CounterType::Normal => "normal",
        }
    }

    pub fn from_string(s: &str) -> Self {
        match s {
            "global" => CounterType::Global,
            "stitch" => CounterType::Stitch,
            "normal" => CounterType::Normal,
            _ => CounterType::Normal,
        }
    }

    pub fn is_user_deletable(&self) -> bool {
        matches!(self, CounterType::Normal)
    }

    pub fn is_singleton_per_part(&self) -> bool {
        matches!(self, CounterType::Global | CounterType::Stitch)
    }

    pub fn can_link_globally(&self) -> bool {
        matches!(self, CounterType::Normal)
    }
}

/// Top-level piece of work. An id of 0 means "not yet stored".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Project {
    id: i64,
    name: String,
    description: String,
    date_created: NaiveDate,
    time_taken: u64,
    date_completed: Option<NaiveDate>,
    is_complete: bool,
    #[serde(rename = "type")]
    project_type: ProjectType,
}

impl Project {
    pub fn new(name: impl Into<String>) -> ValidationResult<Self> {
        let name = name.into();
        validate_name(&name)?;

        Ok(Project {
            id: 0,
            name,
            description: String::new(),
            date_created: Local::now().date_naive(),
            time_taken: 0,
            date_completed: None,
            is_complete: false,
            project_type: ProjectType::default(),
        })
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = id;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_date_created(mut self, date_created: NaiveDate) -> Self {
        self.date_created = date_created;
        self
    }

    pub fn with_time_taken(mut self, time_taken: u64) -> Self {
        self.time_taken = time_taken;
        self
    }

    pub fn with_date_completed(mut self, date_completed: Option<NaiveDate>) -> Self {
        self.date_completed = date_completed;
        self
    }

    pub fn with_complete(mut self, is_complete: bool) -> Self {
        self.is_complete = is_complete;
        self
    }

    pub fn with_type(mut self, project_type: ProjectType) -> Self {
        self.project_type = project_type;
        self
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> ValidationResult<()> {
        let name = name.into();
        validate_name(&name)?;
        self.name = name;
        Ok(())
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn date_created(&self) -> NaiveDate {
        self.date_created
    }

    /// Accumulated working time
    pub fn time_taken(&self) -> u64 {
        self.time_taken
    }

    pub fn set_time_taken(&mut self, time_taken: u64) {
        self.time_taken = time_taken;
    }

    pub fn date_completed(&self) -> Option<NaiveDate> {
        self.date_completed
    }

    pub fn set_date_completed(&mut self, date_completed: Option<NaiveDate>) {
        self.date_completed = date_completed;
    }

    pub fn is_complete(&self) -> bool {
        self.is_complete
    }

    pub fn set_complete(&mut self, is_complete: bool) {
        self.is_complete = is_complete;
    }

    pub fn project_type(&self) -> ProjectType {
        self.project_type
    }

    pub fn set_type(&mut self, project_type: ProjectType) {
        self.project_type = project_type;
    }

    /// Flag the project complete and stamp the completion date
    pub fn mark_complete(&mut self, on: NaiveDate) {
        self.is_complete = true;
        self.date_completed = Some(on);
    }

    pub fn mark_incomplete(&mut self) {
        self.is_complete = false;
        self.date_completed = None;
    }
}

/// A unit of work inside a project
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Part {
    id: i64,
    name: String,
    description: String,
    owning_project_id: i64,
    is_current: bool,
    is_complete: bool,
}

impl Part {
    pub fn new(name: impl Into<String>, owning_project_id: i64) -> ValidationResult<Self> {
        let name = name.into();
        validate_name(&name)?;

        Ok(Part {
            id: 0,
            name,
            description: String::new(),
            owning_project_id,
            is_current: false,
            is_complete: false,
        })
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = id;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_current(mut self, is_current: bool) -> Self {
        self.is_current = is_current;
        self
    }

    pub fn with_complete(mut self, is_complete: bool) -> Self {
        self.is_complete = is_complete;
        self
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> ValidationResult<()> {
        let name = name.into();
        validate_name(&name)?;
        self.name = name;
        Ok(())
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn owning_project_id(&self) -> i64 {
        self.owning_project_id
    }

    /// Whether this is the part currently being worked on
    pub fn is_current(&self) -> bool {
        self.is_current
    }

    pub fn set_current(&mut self, is_current: bool) {
        self.is_current = is_current;
    }

    pub fn is_complete(&self) -> bool {
        self.is_complete
    }

    pub fn set_complete(&mut self, is_complete: bool) {
        self.is_complete = is_complete;
    }
}
