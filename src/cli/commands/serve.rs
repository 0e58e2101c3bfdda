//! Web server command.

use console::style;

use crate::config::Settings;
use crate::repository::util::redact_url_password;

/// Start the web server.
pub async fn cmd_serve(settings: &Settings, bind: Option<&str>) -> anyhow::Result<()> {
    let mut settings = settings.clone();
    if let Some(bind) = bind {
        let (host, port) = parse_bind_address(bind, settings.port)?;
        settings.host = host;
        settings.port = port;
    }

    println!(
        "{} Database: {}",
        style("→").cyan(),
        redact_url_password(&settings.database_url)
    );
    println!(
        "{} Starting backup log server at http://{}:{}",
        style("→").cyan(),
        settings.host,
        settings.port
    );
    println!("  Press Ctrl+C to stop");

    crate::server::serve(&settings).await
}

/// Parse a bind address that can be:
/// - Just a port: "3001" -> 127.0.0.1:3001
/// - Just a host: "0.0.0.0" -> 0.0.0.0:<default>
/// - Host and port: "0.0.0.0:3001" -> 0.0.0.0:3001
fn parse_bind_address(bind: &str, default_port: u16) -> anyhow::Result<(String, u16)> {
    // Try parsing as just a port number
    if let Ok(port) = bind.parse::<u16>() {
        return Ok(("127.0.0.1".to_string(), port));
    }

    // Try parsing as host:port
    if let Some((host, port_str)) = bind.rsplit_once(':') {
        if let Ok(port) = port_str.parse::<u16>() {
            return Ok((host.to_string(), port));
        }
    }

    // Must be just a host, use the default port
    Ok((bind.to_string(), default_port))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bind_address() {
        assert_eq!(
            parse_bind_address("3005", 3001).unwrap(),
            ("127.0.0.1".to_string(), 3005)
        );
        assert_eq!(
            parse_bind_address("0.0.0.0:8080", 3001).unwrap(),
            ("0.0.0.0".to_string(), 8080)
        );
        assert_eq!(
            parse_bind_address("0.0.0.0", 3001).unwrap(),
            ("0.0.0.0".to_string(), 3001)
        );
    }
}
