//! Cloud provider naming schemes. These only shape availability zone labels;
//! they never influence address allocation.

use serde::Serialize;

const ZONE_LETTERS: [char; 6] = ['a', 'b', 'c', 'd', 'e', 'f'];
const ZONE_NUMBERS: [u8; 3] = [1, 2, 3];

/// Provider name plus how it formats zone labels.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// `us-east-1a`
    Eks,
    /// `us-central1-a`
    Gke,
    /// `eastus-1`
    Aks,
    /// `region-1`
    Kubernetes,
}

/// Accepted spellings, compared case-insensitively.
static PROVIDER_ALIASES: [(&str, Provider); 11] = [
    ("eks", Provider::Eks),
    ("aws", Provider::Eks),
    ("gke", Provider::Gke),
    ("gcp", Provider::Gke),
    ("google", Provider::Gke),
    ("aks", Provider::Aks),
    ("azure", Provider::Aks),
    ("kubernetes", Provider::Kubernetes),
    ("k8s", Provider::Kubernetes),
    ("generic", Provider::Kubernetes),
    ("vanilla", Provider::Kubernetes),
];

impl Provider {
    /// Normalize a provider name. Unknown names fall back to the generic
    /// Kubernetes scheme.
    pub fn resolve(name: Option<&str>) -> Provider {
        let Some(name) = name.map(str::trim).filter(|n| !n.is_empty()) else {
            return Provider::Kubernetes;
        };
        match PROVIDER_ALIASES
            .iter()
            .find(|(alias, _)| alias.eq_ignore_ascii_case(name))
        {
            Some((_, provider)) => *provider,
            None => {
                log::warn!("unknown provider '{name}', using kubernetes zone labels");
                Provider::Kubernetes
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Provider::Eks => "eks",
            Provider::Gke => "gke",
            Provider::Aks => "aks",
            Provider::Kubernetes => "kubernetes",
        }
    }

    pub fn default_region(&self) -> &'static str {
        match self {
            Provider::Eks => "us-east-1",
            Provider::Gke => "us-central1",
            Provider::Aks => "eastus",
            Provider::Kubernetes => "region",
        }
    }

    /// Zone label for the `index`-th subnet. Labels wrap once the zone set is
    /// used up.
    pub fn zone_label(&self, region: &str, index: usize) -> String {
        match self {
            Provider::Eks => format!("{region}{}", ZONE_LETTERS[index % ZONE_LETTERS.len()]),
            Provider::Gke => format!("{region}-{}", ZONE_LETTERS[index % ZONE_LETTERS.len()]),
            Provider::Aks | Provider::Kubernetes => {
                format!("{region}-{}", ZONE_NUMBERS[index % ZONE_NUMBERS.len()])
            }
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_aliases() {
        assert_eq!(Provider::resolve(Some("k8s")), Provider::Kubernetes);
        assert_eq!(Provider::resolve(Some("EKS")), Provider::Eks);
        assert_eq!(Provider::resolve(Some("aws")), Provider::Eks);
        assert_eq!(Provider::resolve(Some(" gcp ")), Provider::Gke);
        assert_eq!(Provider::resolve(Some("Azure")), Provider::Aks);
        assert_eq!(Provider::resolve(Some("openstack")), Provider::Kubernetes);
        assert_eq!(Provider::resolve(Some("")), Provider::Kubernetes);
        assert_eq!(Provider::resolve(None), Provider::Kubernetes);
    }

    #[test]
    fn test_zone_labels() {
        assert_eq!(Provider::Eks.zone_label("us-west-2", 0), "us-west-2a");
        assert_eq!(Provider::Eks.zone_label("us-west-2", 2), "us-west-2c");
        assert_eq!(Provider::Gke.zone_label("europe-west1", 1), "europe-west1-b");
        assert_eq!(Provider::Aks.zone_label("eastus", 0), "eastus-1");
        assert_eq!(Provider::Kubernetes.zone_label("dc1", 2), "dc1-3");
    }

    #[test]
    fn test_zone_labels_wrap() {
        assert_eq!(Provider::Aks.zone_label("eastus", 3), "eastus-1");
        assert_eq!(Provider::Eks.zone_label("us-east-1", 6), "us-east-1a");
        assert_eq!(Provider::Gke.zone_label("us-central1", 7), "us-central1-b");
    }

    #[test]
    fn test_default_region() {
        assert_eq!(Provider::Eks.default_region(), "us-east-1");
        assert_eq!(Provider::Gke.to_string(), "gke");
    }
}
