//! Text and JSON views of the generator state

use std::fmt::Write;

use serde::Serialize;

use crate::accounts::WalletBackend;
use crate::session::{AccountView, GeneratorState};
use crate::Result;

pub const TITLE: &str = "Mnemonic Account Generator";
pub const SUBTITLE: &str = "Generate Ethereum Addresses From Mnemonic (Secret Recovery Phrase)";
pub const SECURITY_WARNING: &[&str] = &[
    "For greatest security, only use on a computer you fully trust.",
    "Ideally, use on a computer that is not connected to the internet, and never will be.",
];

#[derive(Serialize)]
struct JsonView<'a> {
    accounts: Vec<AccountView<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    xpub: Option<&'a str>,
}

pub fn render_text<B: WalletBackend>(state: &GeneratorState<B>) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = write_text(&mut out, state);
    out
}

fn write_text<B: WalletBackend>(out: &mut String, state: &GeneratorState<B>) -> std::fmt::Result {
    writeln!(out, "{}", TITLE)?;
    writeln!(out, "{}", SUBTITLE)?;
    writeln!(out)?;
    writeln!(out, "Security Warning")?;
    for line in SECURITY_WARNING {
        writeln!(out, "  {}", line)?;
    }
    writeln!(out)?;
    writeln!(
        out,
        "Number of accounts: {} (can be slow!)",
        state.account_count()
    )?;

    if let Some(error) = state.error() {
        writeln!(out)?;
        writeln!(out, "Error: {}", error)?;
    }

    let views = state.visible_accounts();
    if views.is_empty() {
        return Ok(());
    }

    writeln!(out)?;
    writeln!(out, "Generated Accounts ({})", views.len())?;
    for view in views {
        writeln!(out)?;
        writeln!(out, "Path:        {}", view.path)?;
        writeln!(out, "Address:     {}", view.address)?;
        if let Some(private_key) = view.private_key {
            writeln!(out, "Private Key: {}", private_key)?;
        }
    }
    Ok(())
}

/// Pretty JSON with the same private key rule as the text view
pub fn render_json<B: WalletBackend>(
    state: &GeneratorState<B>,
    xpub: Option<&str>,
) -> Result<String> {
    let view = JsonView {
        accounts: state.visible_accounts(),
        error: state.error(),
        xpub,
    };
    Ok(serde_json::to_string_pretty(&view)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HARDHAT_PHRASE: &str = "test test test test test test test test test test test junk";
    const KEY_ZERO: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    fn generated(show_private_keys: bool) -> GeneratorState {
        let mut state = GeneratorState::new();
        state.set_mnemonic(HARDHAT_PHRASE);
        state.set_account_count(2);
        state.set_show_private_keys(show_private_keys);
        state.generate_accounts();
        state
    }

    #[test]
    fn text_hides_keys_by_default() {
        let text = render_text(&generated(false));
        assert!(text.starts_with(TITLE));
        assert!(text.contains("Security Warning"));
        assert!(text.contains("Number of accounts: 2 (can be slow!)"));
        assert!(text.contains("Generated Accounts (2)"));
        assert!(text.contains("Path:        m/44'/60'/0'/0/1"));
        assert!(text.contains("Address:     0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"));
        assert!(!text.contains("Private Key"));
        assert!(!text.contains(KEY_ZERO));
    }

    #[test]
    fn text_shows_keys_when_enabled() {
        let text = render_text(&generated(true));
        assert!(text.contains(&format!("Private Key: {}", KEY_ZERO)));
        assert_eq!(text.matches("Private Key:").count(), 2);
    }

    #[test]
    fn text_shows_error_without_accounts() {
        let mut state = GeneratorState::new();
        state.generate_accounts();
        let text = render_text(&state);
        assert!(text.contains("Error: Please enter a mnemonic phrase"));
        assert!(text.contains("Number of accounts: 10 (can be slow!)"));
        assert!(!text.contains("Generated Accounts"));
    }

    #[test]
    fn text_header_tracks_requested_count() {
        let mut state = GeneratorState::new();
        state.set_account_count_input("250");
        let text = render_text(&state);
        assert!(text.contains("Number of accounts: 250 (can be slow!)"));
        assert!(!text.contains("Generated Accounts"));
    }

    #[test]
    fn json_view() {
        let json = render_json(&generated(false), Some("xpub-test")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let accounts = value["accounts"].as_array().unwrap();
        assert_eq!(accounts.len(), 2);
        assert_eq!(accounts[0]["path"], "m/44'/60'/0'/0/0");
        assert!(accounts[0].get("private_key").is_none());
        assert!(value.get("error").is_none());
        assert_eq!(value["xpub"], "xpub-test");

        let json = render_json(&generated(true), None).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["accounts"][0]["private_key"], KEY_ZERO);
        assert!(value.get("xpub").is_none());
    }
}
