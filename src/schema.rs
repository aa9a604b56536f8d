//! Static schema for Hipache configuration options.
//!
//! One table drives both validation and document generation, so the two can
//! never drift apart. Each entry carries the snake_case key used in
//! declarations, the nesting group, the value kind, the default, and the
//! camelCase name emitted in the JSON document.
//!
//! Defaults mirror the upstream Hipache `config/config.json`.

use serde_json::{Value, json};

/// Primitive kind of an option value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Str,
    Int,
    Bool,
    /// A single address string or a list of address strings
    StrOrList,
}

impl Kind {
    /// Human-readable name used in type-error messages.
    pub fn name(self) -> &'static str {
        match self {
            Self::Str => "string",
            Self::Int => "integer",
            Self::Bool => "boolean",
            Self::StrOrList => "string or list of strings",
        }
    }
}

/// Nesting group an option belongs to in the generated document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Group {
    TopLevel,
    Server,
    Https,
    Http,
}

impl Group {
    /// Key under which a nested group is emitted.
    pub fn key(self) -> &'static str {
        match self {
            Self::TopLevel => "",
            Self::Server => "server",
            Self::Https => "https",
            Self::Http => "http",
        }
    }

    /// The nested groups, in emission order.
    pub const NESTED: [Self; 3] = [Self::Server, Self::Https, Self::Http];
}

/// Default value for an option, representable in a const table.
#[derive(Debug, Clone, Copy)]
pub enum DefaultValue {
    Str(&'static str),
    Int(i64),
    Bool(bool),
    List(&'static [&'static str]),
}

impl DefaultValue {
    /// Convert the default into a JSON value.
    pub fn to_value(self) -> Value {
        match self {
            Self::Str(s) => json!(s),
            Self::Int(i) => json!(i),
            Self::Bool(b) => json!(b),
            Self::List(items) => json!(items),
        }
    }
}

/// One recognized configuration option.
#[derive(Debug, Clone, Copy)]
pub struct OptionSpec {
    /// snake_case identifier used in declarations and accessors
    pub key: &'static str,
    /// Nesting group in the generated document
    pub group: Group,
    /// Value kind enforced at set time
    pub kind: Kind,
    /// Default when the declaration leaves the option unset
    pub default: DefaultValue,
    /// camelCase name emitted in the JSON document
    pub external: &'static str,
}

const LOOPBACK: &[&str] = &["127.0.0.1", "::1"];

/// The full option table, in declaration order.
///
/// Group membership is fixed here; each nesting level keeps its external
/// names disjoint, so generation can never collide keys.
pub const OPTIONS: &[OptionSpec] = &[
    OptionSpec {
        key: "access_log",
        group: Group::TopLevel,
        kind: Kind::Str,
        default: DefaultValue::Str("/var/log/hipache_access.log"),
        external: "accessLog",
    },
    OptionSpec {
        key: "workers",
        group: Group::TopLevel,
        kind: Kind::Int,
        default: DefaultValue::Int(10),
        external: "workers",
    },
    OptionSpec {
        key: "max_sockets",
        group: Group::TopLevel,
        kind: Kind::Int,
        default: DefaultValue::Int(100),
        external: "maxSockets",
    },
    OptionSpec {
        key: "dead_backend_ttl",
        group: Group::TopLevel,
        kind: Kind::Int,
        default: DefaultValue::Int(30),
        external: "deadBackendTTL",
    },
    OptionSpec {
        key: "tcp_timeout",
        group: Group::TopLevel,
        kind: Kind::Int,
        default: DefaultValue::Int(30),
        external: "tcpTimeout",
    },
    OptionSpec {
        key: "retry_on_error",
        group: Group::TopLevel,
        kind: Kind::Int,
        default: DefaultValue::Int(3),
        external: "retryOnError",
    },
    OptionSpec {
        key: "dead_backend_on_500",
        group: Group::TopLevel,
        kind: Kind::Bool,
        default: DefaultValue::Bool(true),
        external: "deadBackendOn500",
    },
    OptionSpec {
        key: "http_keep_alive",
        group: Group::TopLevel,
        kind: Kind::Bool,
        default: DefaultValue::Bool(false),
        external: "httpKeepAlive",
    },
    OptionSpec {
        key: "driver",
        group: Group::TopLevel,
        kind: Kind::Str,
        default: DefaultValue::Str("redis://127.0.0.1:6379"),
        external: "driver",
    },
    OptionSpec {
        key: "https_port",
        group: Group::Https,
        kind: Kind::Int,
        default: DefaultValue::Int(443),
        external: "port",
    },
    OptionSpec {
        key: "https_bind",
        group: Group::Https,
        kind: Kind::StrOrList,
        default: DefaultValue::List(LOOPBACK),
        external: "bind",
    },
    OptionSpec {
        key: "https_key",
        group: Group::Https,
        kind: Kind::Str,
        default: DefaultValue::Str("/etc/ssl/ssl.key"),
        external: "key",
    },
    OptionSpec {
        key: "https_cert",
        group: Group::Https,
        kind: Kind::Str,
        default: DefaultValue::Str("/etc/ssl/ssl.crt"),
        external: "cert",
    },
    OptionSpec {
        key: "http_port",
        group: Group::Http,
        kind: Kind::Int,
        default: DefaultValue::Int(80),
        external: "port",
    },
    OptionSpec {
        key: "http_bind",
        group: Group::Http,
        kind: Kind::StrOrList,
        default: DefaultValue::List(LOOPBACK),
        external: "bind",
    },
];

/// Look up an option by its snake_case key.
pub fn lookup(key: &str) -> Option<&'static OptionSpec> {
    OPTIONS.iter().find(|spec| spec.key == key)
}

/// Iterate the options belonging to one group, in declaration order.
pub fn group_options(group: Group) -> impl Iterator<Item = &'static OptionSpec> {
    OPTIONS.iter().filter(move |spec| spec.group == group)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_known_key() {
        let spec = lookup("dead_backend_ttl").unwrap();
        assert_eq!(spec.external, "deadBackendTTL");
        assert_eq!(spec.kind, Kind::Int);
        assert_eq!(spec.group, Group::TopLevel);
    }

    #[test]
    fn lookup_unknown_key() {
        assert!(lookup("bogus").is_none());
    }

    #[test]
    fn every_key_is_unique() {
        for (i, spec) in OPTIONS.iter().enumerate() {
            assert!(
                OPTIONS.iter().skip(i + 1).all(|other| other.key != spec.key),
                "duplicate key {}",
                spec.key
            );
        }
    }

    #[test]
    fn external_names_are_disjoint_within_nesting_level() {
        for group in [Group::TopLevel, Group::Server, Group::Https, Group::Http] {
            let externals: Vec<_> = group_options(group).map(|s| s.external).collect();
            let mut deduped = externals.clone();
            deduped.sort_unstable();
            deduped.dedup();
            assert_eq!(externals.len(), deduped.len());
        }
    }

    #[test]
    fn defaults_convert_to_json() {
        let bind = lookup("https_bind").unwrap().default.to_value();
        assert_eq!(bind, serde_json::json!(["127.0.0.1", "::1"]));
        let workers = lookup("workers").unwrap().default.to_value();
        assert_eq!(workers, serde_json::json!(10));
    }
}
