//! Action-text parser.
//!
//! Recognised shape:
//!
//! ```text
//! IntentSwap   73.541165 USDC(arbitrum) -> 5.061095891887000125 AVAX(avax)
//! CreateIntent 73.541165 USDC(arbitrum) -> 5.061095891887000125 AVAX(avax)
//! IntentFilled 73.541165 USDC(arbitrum) -> 5.163011091280152576 AVAX(avax)
//! ```
//!
//! Parsing is total: anything that does not fit becomes [`ParsedLeg::Unknown`].

use std::sync::OnceLock;

use regex::Regex;

use crate::amount::Amount;
use crate::types::{ActionWord, LegKind, ParsedLeg, SwapLeg};

static SWAP_LINE: OnceLock<Regex> = OnceLock::new();

fn swap_line() -> &'static Regex {
    SWAP_LINE.get_or_init(|| {
        Regex::new(
            r"^(IntentSwap|CreateIntent|IntentFilled)\s+([0-9.]+)\s+(\w+)\(([\w.]+)\)\s+->\s+([0-9.]+)\s+(\w+)\(([\w.]+)\)",
        )
        .expect("swap line pattern is a valid regex")
    })
}

/// Decimal amount without any rounding. Malformed numbers (`1.2.3`, `.`)
/// are rejected.
fn parse_amount(s: &str) -> Option<Amount> {
    s.parse::<Amount>().ok().filter(|a| !a.is_negative())
}

/// Classify one `action_detail` line.
pub fn parse(detail: &str) -> ParsedLeg {
    let unknown = || ParsedLeg::Unknown {
        raw_text: detail.to_string(),
    };

    let Some(caps) = swap_line().captures(detail) else {
        return unknown();
    };
    let Some(action) = ActionWord::from_word(&caps[1]) else {
        return unknown();
    };
    let (Some(from_amount), Some(to_amount)) = (parse_amount(&caps[2]), parse_amount(&caps[5]))
    else {
        return unknown();
    };

    let leg = SwapLeg {
        action,
        from_amount,
        from_token: caps[3].to_string(),
        from_chain: caps[4].to_string(),
        to_amount,
        to_token: caps[6].to_string(),
        to_chain: caps[7].to_string(),
        raw_text: detail.to_string(),
    };

    match action.kind() {
        LegKind::Quote => ParsedLeg::Quote(leg),
        LegKind::Fill => ParsedLeg::Fill(leg),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intent_swap_and_create_intent_are_quotes() {
        for word in ["IntentSwap", "CreateIntent"] {
            let line = format!("{word} 73.541165 USDC(arbitrum) -> 5.061095891887000125 AVAX(avax)");
            let ParsedLeg::Quote(leg) = parse(&line) else {
                panic!("expected quote for {word}");
            };
            assert_eq!(leg.from_amount.to_string(), "73.541165");
            assert_eq!(leg.from_token, "USDC");
            assert_eq!(leg.from_chain, "arbitrum");
            assert_eq!(leg.to_amount.to_string(), "5.061095891887000125");
            assert_eq!(leg.to_token, "AVAX");
            assert_eq!(leg.to_chain, "avax");
            assert_eq!(leg.raw_text, line);
        }
    }

    #[test]
    fn intent_filled_is_a_fill() {
        let leg = parse("IntentFilled 100 USDC(arbitrum) -> 9.5 AVAX(avax)");
        assert_eq!(leg.kind(), Some(LegKind::Fill));
    }

    #[test]
    fn dotted_chain_ids_are_accepted() {
        let ParsedLeg::Quote(leg) = parse("IntentSwap 1.5 ETH(0x2105.base) -> 4000 USDC(sonic.mainnet)")
        else {
            panic!("expected quote");
        };
        assert_eq!(leg.from_chain, "0x2105.base");
        assert_eq!(leg.to_chain, "sonic.mainnet");
    }

    #[test]
    fn unrecognised_action_word_is_unknown() {
        let line = "SomeOtherAction 1 FOO(bar) -> 2 BAZ(qux)";
        assert_eq!(
            parse(line),
            ParsedLeg::Unknown {
                raw_text: line.to_string()
            }
        );
    }

    #[test]
    fn malformed_lines_are_unknown() {
        for line in [
            "",
            "Transfer 10 USDC to 0xabc",
            "IntentSwap 1.2.3 USDC(arbitrum) -> 2 AVAX(avax)",
            "IntentSwap 10 USDC(arbitrum) 9 AVAX(avax)",
            "IntentSwap -10 USDC(arbitrum) -> 9 AVAX(avax)",
            "  IntentSwap 10 USDC(arbitrum) -> 9 AVAX(avax)",
        ] {
            assert_eq!(parse(line).kind(), None, "line {line:?} should be unknown");
        }
    }

    #[test]
    fn thirty_digit_amounts_are_kept_exactly() {
        let line = "IntentSwap 100000000000.123456789012345678 PEPE(ethereum) -> 1.00000000000000000000000000001 USDC(sonic)";
        let ParsedLeg::Quote(leg) = parse(line) else {
            panic!("expected quote");
        };
        assert_eq!(leg.from_amount.to_string(), "100000000000.123456789012345678");
        assert_eq!(leg.to_amount.to_string(), "1.00000000000000000000000000001");
    }
}
