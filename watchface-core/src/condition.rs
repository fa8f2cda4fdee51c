use std::fmt;

/// Which variant of the face is being drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DisplayMode {
    /// Low-power mode: outline icons, no seconds.
    Ambient,
    #[default]
    Interactive,
}

impl DisplayMode {
    pub fn from_ambient(ambient: bool) -> Self {
        if ambient {
            DisplayMode::Ambient
        } else {
            DisplayMode::Interactive
        }
    }

    pub fn is_ambient(&self) -> bool {
        matches!(self, DisplayMode::Ambient)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayMode::Ambient => "ambient",
            DisplayMode::Interactive => "interactive",
        }
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Semantic weather category derived from an OpenWeatherMap condition code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Condition {
    Storm,
    LightRain,
    Rain,
    Snow,
    Fog,
    Clear,
    LightClouds,
    Clouds,
}

impl Condition {
    /// Category for an OpenWeatherMap condition code, `None` when the code is
    /// outside every known range.
    ///
    /// Code table: <https://openweathermap.org/weather-conditions>
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            200..=232 => Some(Condition::Storm),
            300..=321 => Some(Condition::LightRain),
            500..=504 => Some(Condition::Rain),
            511 => Some(Condition::Snow),
            520..=531 => Some(Condition::Rain),
            600..=622 => Some(Condition::Snow),
            // Dust (761) and tornado (781) are drawn as storms.
            761 | 781 => Some(Condition::Storm),
            701..=760 => Some(Condition::Fog),
            800 => Some(Condition::Clear),
            801 => Some(Condition::LightClouds),
            802..=804 => Some(Condition::Clouds),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::Storm => "storm",
            Condition::LightRain => "light_rain",
            Condition::Rain => "rain",
            Condition::Snow => "snow",
            Condition::Fog => "fog",
            Condition::Clear => "clear",
            Condition::LightClouds => "light_clouds",
            Condition::Clouds => "clouds",
        }
    }

    pub const fn all() -> &'static [Condition] {
        &[
            Condition::Storm,
            Condition::LightRain,
            Condition::Rain,
            Condition::Snow,
            Condition::Fog,
            Condition::Clear,
            Condition::LightClouds,
            Condition::Clouds,
        ]
    }

    pub fn icon(self, mode: DisplayMode) -> IconId {
        IconId { condition: self, mode }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier of an icon asset: one per category and display mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IconId {
    pub condition: Condition,
    pub mode: DisplayMode,
}

impl IconId {
    /// Asset name, e.g. `storm_outline` (ambient) or `art_storm` (interactive).
    pub fn asset_name(&self) -> String {
        match self.mode {
            DisplayMode::Ambient => format!("{}_outline", self.condition),
            DisplayMode::Interactive => format!("art_{}", self.condition),
        }
    }
}

impl fmt::Display for IconId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.asset_name())
    }
}

/// Icon to draw for `code` in `mode`, or `None` for an unknown code.
pub fn classify(code: i32, mode: DisplayMode) -> Option<IconId> {
    Condition::from_code(code).map(|c| c.icon(mode))
}
