//! Deployment configuration, passed explicitly into the layout functions.
//!
//! ```toml
//! timezone = "America/New_York"
//! busy_day_threshold = 3
//!
//! [window]
//! first_hour = 8
//! last_hour = 20
//!
//! [[calendars]]
//! id = "work@example.com"
//! name = "Work"
//! color = "#4285F4"
//!
//! [priorities]
//! Family = 1
//! Work = 2
//! ```

use std::path::Path;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{AgendaError, Result};
use crate::matcher::DEFAULT_BUSY_DAY_THRESHOLD;
use crate::priority::CalendarPriority;
use crate::timeline::HourWindow;

/// A calendar the deployment reads from, with its display metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarSource {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgendaConfig {
    /// Timezone used for local days and hours.
    pub timezone: Tz,
    pub window: HourWindow,
    /// Same-day event count that triggers the busy-day advisory.
    pub busy_day_threshold: usize,
    pub calendars: Vec<CalendarSource>,
    pub priorities: CalendarPriority,
}

impl Default for AgendaConfig {
    fn default() -> Self {
        Self {
            timezone: Tz::UTC,
            window: HourWindow::default(),
            busy_day_threshold: DEFAULT_BUSY_DAY_THRESHOLD,
            calendars: Vec::new(),
            priorities: CalendarPriority::default(),
        }
    }
}

impl AgendaConfig {
    /// Parse and validate a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: AgendaConfig =
            toml::from_str(content).map_err(|e| AgendaError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a JSON document. Missing keys take their defaults.
    pub fn from_json_str(content: &str) -> Result<Self> {
        let config: AgendaConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<()> {
        self.window.validate()?;

        if self.busy_day_threshold == 0 {
            return Err(AgendaError::Config(
                "busy_day_threshold must be at least 1".to_string(),
            ));
        }

        for (i, calendar) in self.calendars.iter().enumerate() {
            if self.calendars[..i].iter().any(|c| c.id == calendar.id) {
                return Err(AgendaError::Config(format!(
                    "calendar '{}' is listed more than once",
                    calendar.id
                )));
            }
        }

        Ok(())
    }

    /// Override the timezone by IANA name.
    pub fn with_timezone(mut self, name: &str) -> Result<Self> {
        self.timezone = name
            .parse()
            .map_err(|_| AgendaError::InvalidTimezone(name.to_string()))?;
        Ok(self)
    }

    pub fn calendar(&self, id: &str) -> Option<&CalendarSource> {
        self.calendars.iter().find(|c| c.id == id)
    }
}
