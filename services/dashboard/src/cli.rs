use crate::server;
use crate::terminal::{run_evaluate, run_fields, EvaluateArgs};
use clap::{Args, Parser, Subcommand};
use loan_advisor::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Loan Advisor",
    about = "Serve the loan decision dashboard or evaluate applicants from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the dashboard HTTP service (default command)
    Serve(ServeArgs),
    /// Score one applicant profile and print the decision
    Evaluate(EvaluateArgs),
    /// List the applicant fields and the choices of categorical fields
    Fields,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Override the scoring service base URL
    #[arg(long)]
    pub(crate) scoring_url: Option<String>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Evaluate(args) => run_evaluate(args).await,
        Command::Fields => run_fields(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_serve() {
        let cli = Cli::try_parse_from(["loan-advisor"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn evaluate_accepts_repeated_assignments() {
        let cli = Cli::try_parse_from([
            "loan-advisor",
            "evaluate",
            "--set",
            "person_income=82000",
            "--set",
            "person_education=High School",
            "--json",
        ])
        .expect("parses");
        let Some(Command::Evaluate(args)) = cli.command else {
            panic!("expected evaluate command");
        };
        assert_eq!(args.set.len(), 2);
        assert_eq!(args.set[1].value, "High School");
        assert!(args.json);
    }

    #[test]
    fn evaluate_rejects_assignment_without_equals() {
        assert!(Cli::try_parse_from(["loan-advisor", "evaluate", "--set", "person_income"]).is_err());
    }
}
