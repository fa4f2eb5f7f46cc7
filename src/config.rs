/// Declares a configuration struct with default values.
///
/// Every field gets `with_*`, `set_*` and `get_*` accessors. Configurations
/// can be read from TOML, where missing fields fall back to their defaults.
macro_rules! config {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $( $field:ident: $ty:ty = $default:expr ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
        #[serde(default)]
        $vis struct $name {
            $( $field: $ty, )*
        }

        impl $name {
            pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
                Ok(toml::from_str(content)?)
            }

            pub fn from_file<P: AsRef<std::path::Path>>(file_path: P) -> anyhow::Result<Self> {
                let canonic_path = std::fs::canonicalize(file_path)?;
                let content = std::fs::read_to_string(canonic_path)?;
                Self::from_toml_str(&content)
            }

            pub fn from_optional_file<P: AsRef<std::path::Path>>(
                file_path: Option<P>,
            ) -> anyhow::Result<Self> {
                match file_path {
                    Some(p) => Self::from_file(p),
                    None => Ok(Self::default()),
                }
            }

            paste::paste! {
                $(
                    pub fn [<with_ $field>](mut self, $field: $ty) -> Self {
                        self.$field = $field;
                        self
                    }

                    pub fn [<set_ $field>](&mut self, $field: $ty) {
                        self.$field = $field;
                    }

                    pub fn [<get_ $field>](&self) -> &$ty {
                        &self.$field
                    }
                )*
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name {
                    $( $field: $default, )*
                }
            }
        }
    };
}

config! {
    /// Settings shared by both DAG builder variants.
    pub struct DagBuilderConfig {
        check_invariants: bool = false,
        reclaim_states: bool = true,
        initial_capacity: usize = 16,
    }
}

#[test]
fn test_partial_config_uses_defaults() {
    let config = DagBuilderConfig::from_toml_str("check_invariants = true").unwrap();

    assert!(*config.get_check_invariants());
    assert!(*config.get_reclaim_states());
    assert_eq!(*config.get_initial_capacity(), 16);
    assert_eq!(
        DagBuilderConfig::from_optional_file(None::<&str>).unwrap(),
        DagBuilderConfig::default()
    );
}
