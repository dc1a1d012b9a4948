//! Display helpers shared by the API and the history view

/// Render a base-unit amount with `decimals`, truncated to `max_fraction_digits`
/// and without trailing zeros. Non-numeric input renders as "0".
pub fn format_token_amount(raw: &str, decimals: u8, max_fraction_digits: usize) -> String {
	let digits = raw.trim();
	if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
		return "0".to_string();
	}
	let digits = digits.trim_start_matches('0');
	let decimals = decimals as usize;

	let (whole, fraction) = if digits.len() > decimals {
		let split = digits.len() - decimals;
		(digits[..split].to_string(), digits[split..].to_string())
	} else {
		("0".to_string(), format!("{:0>width$}", digits, width = decimals))
	};

	let fraction: String = fraction.chars().take(max_fraction_digits).collect();
	let fraction = fraction.trim_end_matches('0');
	if fraction.is_empty() {
		whole
	} else {
		format!("{}.{}", whole, fraction)
	}
}

/// `$1,234.50` style rendering with thousands separators
pub fn format_usd(value: f64) -> String {
	let value = if value.is_finite() { value } else { 0.0 };
	let cents = (value.abs() * 100.0).round() as u128;
	let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
	let whole = (cents / 100).to_string();
	let fraction = cents % 100;

	let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
	for (i, c) in whole.chars().enumerate() {
		if i > 0 && (whole.len() - i) % 3 == 0 {
			grouped.push(',');
		}
		grouped.push(c);
	}
	format!("{}${}.{:02}", sign, grouped, fraction)
}

/// Syntactic check for a `.eth` name: at least two labels, each made of
/// ASCII alphanumerics and inner hyphens
pub fn is_valid_ens_name(name: &str) -> bool {
	let name = name.trim();
	let labels: Vec<&str> = name.split('.').collect();
	if labels.len() < 2 || labels.last() != Some(&"eth") {
		return false;
	}
	labels.iter().all(|label| {
		!label.is_empty()
			&& !label.starts_with('-')
			&& !label.ends_with('-')
			&& label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
	})
}

/// `0x1234…abcd`
pub fn shorten_address(address: &str) -> String {
	if address.len() <= 12 || !address.is_ascii() {
		return address.to_string();
	}
	format!("{}…{}", &address[..6], &address[address.len() - 4..])
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_format_token_amount() {
		assert_eq!(format_token_amount("1500000", 6, 4), "1.5");
		assert_eq!(format_token_amount("1000000000000000000", 18, 4), "1");
		assert_eq!(format_token_amount("123456789", 6, 2), "123.45");
		assert_eq!(format_token_amount("5", 6, 6), "0.000005");
		assert_eq!(format_token_amount("5", 6, 4), "0");
		assert_eq!(format_token_amount("0", 18, 4), "0");
		assert_eq!(format_token_amount("abc", 18, 4), "0");
	}

	#[test]
	fn test_format_usd() {
		assert_eq!(format_usd(1234.5), "$1,234.50");
		assert_eq!(format_usd(0.0), "$0.00");
		assert_eq!(format_usd(999.999), "$1,000.00");
		assert_eq!(format_usd(1234567.891), "$1,234,567.89");
		assert_eq!(format_usd(-12.5), "-$12.50");
		// rounds to zero cents, so no sign
		assert_eq!(format_usd(-0.001), "$0.00");
	}

	#[test]
	fn test_ens_name_validation() {
		assert!(is_valid_ens_name("vitalik.eth"));
		assert!(is_valid_ens_name("pay.kite-app.eth"));
		assert!(!is_valid_ens_name("vitalik"));
		assert!(!is_valid_ens_name("vitalik.com"));
		assert!(!is_valid_ens_name("-bad.eth"));
		assert!(!is_valid_ens_name(".eth"));
	}

	#[test]
	fn test_shorten_address() {
		assert_eq!(
			shorten_address("0x1234567890abcdef1234567890abcdef12345678"),
			"0x1234…5678"
		);
		assert_eq!(shorten_address("0x12"), "0x12");
	}
}
