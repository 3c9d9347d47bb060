// ── Rule-set utilities ──
//
// String-list parsing shared by the server and routing profile
// managers: comma-separated DNS lists, newline-separated rule text,
// and the IPv4 check used for server addresses.

/// Split `text` on `delimiter`, trim every token, and drop empty ones.
pub fn split_trimmed(text: &str, delimiter: char) -> Vec<String> {
    text.split(delimiter)
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Parse a comma-separated DNS server list.
pub fn parse_dns_servers(csv: &str) -> Vec<String> {
    split_trimmed(csv, ',')
}

/// Parse rule text entered one rule per line.
pub fn parse_rules(text: &str) -> Vec<String> {
    split_trimmed(text, '\n')
}

/// Dotted-quad IPv4 check: exactly four non-empty runs of ASCII digits,
/// each in `0..=255`. Leading zeros are fine (`010` is 10); signs,
/// whitespace and suffixes are not.
pub fn is_valid_ipv4(ip: &str) -> bool {
    let octets: Vec<&str> = ip.split('.').collect();
    octets.len() == 4
        && octets.iter().all(|octet| {
            !octet.is_empty()
                && octet.bytes().all(|b| b.is_ascii_digit())
                && octet.parse::<u8>().is_ok()
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ipv4_accepts_dotted_quad() {
        assert!(is_valid_ipv4("192.168.1.100"));
        assert!(is_valid_ipv4("0.0.0.0"));
        assert!(is_valid_ipv4("255.255.255.255"));
    }

    #[test]
    fn ipv4_rejects_malformed_input() {
        assert!(!is_valid_ipv4("192.168.1"));
        assert!(!is_valid_ipv4("192.168.1.256"));
        assert!(!is_valid_ipv4("abc.def.gh.i"));
        assert!(!is_valid_ipv4(""));
        assert!(!is_valid_ipv4("1.2.3.4.5"));
        assert!(!is_valid_ipv4(" 1.2.3.4"));
        assert!(!is_valid_ipv4("1.2.3.4/24"));
        assert!(!is_valid_ipv4("-1.2.3.4"));
        assert!(!is_valid_ipv4("+1.2.3.4"));
        assert!(!is_valid_ipv4("1..3.4"));
        assert!(!is_valid_ipv4("1.2.3.4 "));
        assert!(!is_valid_ipv4("1.2.3.0256"));
    }

    #[test]
    fn ipv4_tolerates_leading_zeros() {
        assert!(is_valid_ipv4("192.168.01.1"));
        assert!(is_valid_ipv4("192.168.001.001"));
        assert!(is_valid_ipv4("010.0.0.1"));
        assert!(is_valid_ipv4("000.000.000.255"));
    }

    #[test]
    fn dns_list_is_trimmed_and_compacted() {
        assert_eq!(
            parse_dns_servers(" 8.8.8.8 ,, 8.8.4.4,"),
            vec!["8.8.8.8", "8.8.4.4"]
        );
        assert!(parse_dns_servers("").is_empty());
        assert!(parse_dns_servers(" , ,").is_empty());
    }

    #[test]
    fn rules_drop_blank_lines() {
        assert_eq!(parse_rules("a\nb\n\n c "), vec!["a", "b", "c"]);
        assert_eq!(parse_rules("*.internal\r\ncompany.com"), vec![
            "*.internal",
            "company.com"
        ]);
    }
}
