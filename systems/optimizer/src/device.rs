use space_shooter_core::QualityTier;

const MOBILE_MARKERS: [&str; 8] = [
    "android",
    "webos",
    "iphone",
    "ipad",
    "ipod",
    "blackberry",
    "iemobile",
    "opera mini",
];
const LOW_END_RENDERERS: [&str; 2] = ["Mali", "Adreno 3"];
const LOW_CORE_COUNT: u32 = 2;

/// Capabilities of the host used to pick the starting quality tier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeviceProfile {
    /// Browser-style user agent or platform description.
    pub user_agent: String,
    /// Number of logical processors available.
    pub hardware_concurrency: u32,
    /// Whether hardware-accelerated graphics are available.
    pub accelerated_graphics: bool,
    /// Renderer string reported by the graphics driver, when known.
    pub renderer: Option<String>,
}

impl DeviceProfile {
    /// Describes the machine running the current process.
    #[must_use]
    pub fn native() -> Self {
        let hardware_concurrency = std::thread::available_parallelism()
            .map(|count| u32::try_from(count.get()).unwrap_or(u32::MAX))
            .unwrap_or(1);
        Self {
            user_agent: format!("{} {}", std::env::consts::OS, std::env::consts::ARCH),
            hardware_concurrency,
            accelerated_graphics: true,
            renderer: None,
        }
    }

    /// Returns whether the user agent identifies a handheld device.
    #[must_use]
    pub fn is_mobile(&self) -> bool {
        let agent = self.user_agent.to_ascii_lowercase();
        MOBILE_MARKERS.iter().any(|marker| agent.contains(marker))
    }

    /// Starting tier for this device.
    ///
    /// Handhelds start at medium, or low with two cores or fewer. Missing
    /// acceleration or a known low-end renderer forces low regardless.
    #[must_use]
    pub fn detect_tier(&self) -> QualityTier {
        let mut tier = QualityTier::High;
        if self.is_mobile() {
            tier = if self.hardware_concurrency <= LOW_CORE_COUNT {
                QualityTier::Low
            } else {
                QualityTier::Medium
            };
        }

        if !self.accelerated_graphics {
            return QualityTier::Low;
        }
        if let Some(renderer) = &self.renderer {
            if LOW_END_RENDERERS.iter().any(|marker| renderer.contains(marker)) {
                return QualityTier::Low;
            }
        }
        tier
    }
}
