use std::fmt;
use url::Url;

/// How frequently a page is likely to change (Sitemap Protocol `changefreq`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeFrequency {
    Always,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Never,
}

impl ChangeFrequency {
    /// Returns the protocol token for this frequency
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Always => "always",
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
            Self::Never => "never",
        }
    }
}

impl fmt::Display for ChangeFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single page listed in the sitemap
#[derive(Debug, Clone, PartialEq)]
pub struct SitemapEntry {
    /// Absolute URL of the page
    pub location: Url,

    /// Expected change frequency, omitted from output when unset
    pub change_frequency: Option<ChangeFrequency>,

    /// Relative priority in `0.0..=1.0`, omitted from output when unset or zero
    pub priority: Option<f64>,
}

impl SitemapEntry {
    /// Creates an entry with only a location
    pub fn new(location: Url) -> Self {
        Self {
            location,
            change_frequency: None,
            priority: None,
        }
    }

    pub fn with_change_frequency(mut self, change_frequency: ChangeFrequency) -> Self {
        self.change_frequency = Some(change_frequency);
        self
    }

    pub fn with_priority(mut self, priority: f64) -> Self {
        self.priority = Some(priority);
        self
    }
}
