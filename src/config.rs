use anyhow::Context;

const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub max_connections: u32,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")
            .context("DATABASE_URL must be set to the campus Postgres instance")?;
        let max_connections = parse_max_connections(
            std::env::var("CAMPUS_DB_MAX_CONNECTIONS").ok().as_deref(),
        )?;

        Ok(Config {
            database_url,
            max_connections,
        })
    }
}

fn parse_max_connections(raw: Option<&str>) -> anyhow::Result<u32> {
    let Some(raw) = raw.map(str::trim).filter(|value| !value.is_empty()) else {
        return Ok(DEFAULT_MAX_CONNECTIONS);
    };
    let value: u32 = raw
        .parse()
        .with_context(|| format!("CAMPUS_DB_MAX_CONNECTIONS must be a positive integer, got `{raw}`"))?;
    anyhow::ensure!(value > 0, "CAMPUS_DB_MAX_CONNECTIONS must be at least 1");
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_connections_defaults_when_unset_or_blank() {
        assert_eq!(parse_max_connections(None).unwrap(), 5);
        assert_eq!(parse_max_connections(Some("  ")).unwrap(), 5);
    }

    #[test]
    fn max_connections_rejects_zero_and_garbage() {
        assert_eq!(parse_max_connections(Some("12")).unwrap(), 12);
        assert!(parse_max_connections(Some("0")).is_err());
        assert!(parse_max_connections(Some("many")).is_err());
    }
}
