//! Text shown on the wizard panels.

/// Panel copy for one product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardTexts {
    pub intro: String,
    pub license: String,
    pub uninstall_intro: String,
    pub process_running: String,
    pub completed: String,
}

impl WizardTexts {
    /// Derives the fixed notices from the product name; intro and license come
    /// from embedded or configured resources.
    pub fn for_product(product_name: &str, intro: String, license: String) -> Self {
        Self {
            intro,
            license,
            uninstall_intro: format!("Thanks for trying {}", product_name),
            process_running: format!(
                "{} is running. Please exit it and re-launch the installer.",
                product_name
            ),
            completed: "All done!".to_string(),
        }
    }
}

/// Static inputs needed to build a wizard.
#[derive(Debug, Clone)]
pub struct WizardSettings {
    pub product_name: String,
    /// Executable name checked before installing and stopped before uninstalling.
    pub process_name: String,
    pub texts: WizardTexts,
}
