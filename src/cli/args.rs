use crate::core::BankConfig;
use crate::types::Money;
use clap::Parser;
use std::path::PathBuf;

/// Run an automated teller terminal against a seeded bank
#[derive(Parser, Debug)]
#[command(name = "atm-engine")]
#[command(about = "Automated teller terminal backed by a validating bank engine", long_about = None)]
pub struct CliArgs {
    /// Directory containing the seed files
    #[arg(
        long = "seed-dir",
        value_name = "DIR",
        default_value = "seed",
        help = "Directory containing cards.csv and accounts.csv"
    )]
    pub seed_dir: PathBuf,

    /// Daily withdrawal limit per card
    #[arg(
        long = "daily-withdrawal-limit",
        value_name = "AMOUNT",
        help = "Daily withdrawal limit per card, in smallest currency units (default: 5000000)"
    )]
    pub daily_withdrawal_limit: Option<i64>,

    /// Daily transfer limit per card
    #[arg(
        long = "daily-transfer-limit",
        value_name = "AMOUNT",
        help = "Daily transfer limit per card, in smallest currency units (default: 10000000)"
    )]
    pub daily_transfer_limit: Option<i64>,

    /// Largest single transfer the terminal accepts
    #[arg(
        long = "transfer-ceiling",
        value_name = "AMOUNT",
        help = "Largest single transfer accepted at the terminal (default: 10000000)"
    )]
    pub transfer_ceiling: Option<i64>,
}

impl CliArgs {
    /// Path of the card directory seed file
    pub fn cards_file(&self) -> PathBuf {
        self.seed_dir.join("cards.csv")
    }

    /// Path of the account balances seed file
    pub fn accounts_file(&self) -> PathBuf {
        self.seed_dir.join("accounts.csv")
    }

    /// Create a BankConfig from CLI arguments
    ///
    /// Any limit not given on the command line falls back to the stock
    /// default.
    ///
    /// # Returns
    ///
    /// A `BankConfig` with values from CLI arguments or defaults.
    pub fn to_bank_config(&self) -> BankConfig {
        let default = BankConfig::default();
        BankConfig {
            daily_withdrawal_limit: self
                .daily_withdrawal_limit
                .map(Money::from_units)
                .unwrap_or(default.daily_withdrawal_limit),
            daily_transfer_limit: self
                .daily_transfer_limit
                .map(Money::from_units)
                .unwrap_or(default.daily_transfer_limit),
            transfer_ceiling: self
                .transfer_ceiling
                .map(Money::from_units)
                .unwrap_or(default.transfer_ceiling),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn default_seed_dir_and_files() {
        let parsed = CliArgs::try_parse_from(["program"]).unwrap();
        assert_eq!(parsed.seed_dir, PathBuf::from("seed"));
        assert_eq!(parsed.cards_file(), PathBuf::from("seed/cards.csv"));
        assert_eq!(parsed.accounts_file(), PathBuf::from("seed/accounts.csv"));
    }

    #[test]
    fn custom_seed_dir() {
        let parsed = CliArgs::try_parse_from(["program", "--seed-dir", "/etc/bank"]).unwrap();
        assert_eq!(parsed.cards_file(), PathBuf::from("/etc/bank/cards.csv"));
    }

    #[rstest]
    #[case::all_defaults(&["program"], 5_000_000, 10_000_000, 10_000_000)]
    #[case::custom_withdrawal(&["program", "--daily-withdrawal-limit", "2000000"], 2_000_000, 10_000_000, 10_000_000)]
    #[case::custom_transfer(&["program", "--daily-transfer-limit", "4000000"], 5_000_000, 4_000_000, 10_000_000)]
    #[case::custom_ceiling(&["program", "--transfer-ceiling", "500000"], 5_000_000, 10_000_000, 500_000)]
    #[case::all_custom(
        &["program", "--daily-withdrawal-limit", "1", "--daily-transfer-limit", "2", "--transfer-ceiling", "3"],
        1, 2, 3
    )]
    fn bank_config_conversion(
        #[case] args: &[&str],
        #[case] withdrawal: i64,
        #[case] transfer: i64,
        #[case] ceiling: i64,
    ) {
        let parsed = CliArgs::try_parse_from(args).unwrap();
        let config = parsed.to_bank_config();

        assert_eq!(config.daily_withdrawal_limit, Money::from_units(withdrawal));
        assert_eq!(config.daily_transfer_limit, Money::from_units(transfer));
        assert_eq!(config.transfer_ceiling, Money::from_units(ceiling));
    }

    #[rstest]
    #[case::bad_limit(&["program", "--daily-withdrawal-limit", "lots"])]
    #[case::unknown_flag(&["program", "--frobnicate"])]
    fn parsing_errors(#[case] args: &[&str]) {
        let result = CliArgs::try_parse_from(args);
        assert!(result.is_err());
    }
}
