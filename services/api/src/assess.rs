use crate::infra::{build_assessment_service, load_policy, parse_context};
use clap::Args;
use risk_fusion::assessment::{
    ApplicationContext, AssessmentReport, AssessmentRequest, BankingSystem, CustomerType,
    DocumentText, LoanType,
};
use risk_fusion::config::AppConfig;
use risk_fusion::error::AppError;
use risk_fusion::telemetry;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub(crate) struct AssessArgs {
    /// Text document to include in the application (repeatable)
    #[arg(long = "file", required = true)]
    pub(crate) files: Vec<PathBuf>,
    /// conventional or islamic
    #[arg(long, default_value = "conventional", value_parser = parse_context::<BankingSystem>)]
    pub(crate) banking_system: BankingSystem,
    /// home, car, personal or business
    #[arg(long, default_value = "home", value_parser = parse_context::<LoanType>)]
    pub(crate) loan_type: LoanType,
    /// salaried, rental, small-business or large-business
    #[arg(long, default_value = "salaried", value_parser = parse_context::<CustomerType>)]
    pub(crate) customer_type: CustomerType,
    /// Print the full JSON report instead of the summary
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) async fn run_assess(args: AssessArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let documents = args
        .files
        .iter()
        .map(|path| read_document(path))
        .collect::<Result<Vec<_>, _>>()?;
    let context = ApplicationContext {
        banking_system: args.banking_system,
        loan_type: args.loan_type,
        customer_type: args.customer_type,
    };

    let service = build_assessment_service(&config)?;
    let report = service
        .assess(AssessmentRequest::from_documents(documents, context))
        .await?;

    if args.json {
        let rendered = serde_json::to_string_pretty(&report).map_err(std::io::Error::from)?;
        println!("{rendered}");
    } else {
        print!("{}", render_summary(&report));
    }
    Ok(())
}

pub(crate) fn print_policy() -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let policy = load_policy(&config.models)?;
    println!("{}", policy.to_json_pretty()?);
    Ok(())
}

fn read_document(path: &Path) -> Result<DocumentText, AppError> {
    let text = fs::read_to_string(path)?;
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(DocumentText { name, text })
}

pub(crate) fn render_summary(report: &AssessmentReport) -> String {
    let mut out = String::new();
    let facts = &report.facts;
    let credit = &report.credit;
    let decision = &report.decision;

    out.push_str("Loan risk assessment\n");
    out.push_str(&format!(
        "Context: {} | {} | {}\n",
        report.context.banking_system.readable(),
        report.context.loan_type.readable(),
        report.context.customer_type.readable()
    ));

    out.push_str("\nExtracted facts\n");
    out.push_str(&format!("- Monthly income: RM {}\n", facts.monthly_income));
    out.push_str(&format!("- Monthly debt: RM {}\n", facts.monthly_debt));
    out.push_str(&format!("- Employment: {} years\n", facts.employment_years));
    out.push_str(&format!("- Property value: RM {}\n", facts.property_value));
    out.push_str(&format!("- Loan amount: RM {}\n", facts.loan_amount));
    out.push_str(&format!("- Savings: RM {}\n", facts.savings));

    out.push_str(&format!(
        "\nCredit score: {} ({}) | DSR {:.1}% | LTV {:.1}%\n",
        credit.credit_score,
        credit.risk_category.label(),
        credit.dsr,
        credit.ltv
    ));
    for advice in &credit.recommendations {
        out.push_str(&format!("- {advice}\n"));
    }

    out.push_str(&format!(
        "\nFraud score: {} ({}) | Document quality {}/100, {}\n",
        report.fraud.fraud_score,
        report.fraud.risk_level.label(),
        report.document_quality.quality_score,
        report.document_quality.completeness
    ));
    for signal in &report.fraud.signals {
        out.push_str(&format!("- {}\n", signal.description));
    }

    out.push_str(&format!(
        "\nClassifier: {:.2}% approval ({:?} data)\n",
        report.classifier.approval_probability, report.classifier.data_quality
    ));
    out.push_str(&format!(
        "Qualitative: {} ({:?} data)\n",
        display_label(&report.qualitative.label),
        report.qualitative.data_quality
    ));
    if let Some(summary) = &report.qualitative.executive_summary {
        out.push_str(&format!("  {summary}\n"));
    }

    out.push_str(&format!(
        "\nDecision: {} ({:.2}%, tier {})\n",
        decision.recommendation_text, decision.fused_probability, decision.fused_risk_tier
    ));
    let agreement = if decision.model_agreement {
        "models agree"
    } else {
        "models disagree, manual review advised"
    };
    out.push_str(&format!("Agreement: {agreement}\n"));
    out
}

fn display_label(label: &str) -> &str {
    if label.trim().is_empty() {
        "none"
    } else {
        label
    }
}
