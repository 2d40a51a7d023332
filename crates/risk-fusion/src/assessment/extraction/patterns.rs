/// Fields the extractor knows how to populate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FactField {
    MonthlyIncome,
    MonthlyDebt,
    EmploymentYears,
    PropertyValue,
    LoanAmount,
    Savings,
    Age,
}

impl FactField {
    pub const ALL: [FactField; 7] = [
        FactField::MonthlyIncome,
        FactField::MonthlyDebt,
        FactField::EmploymentYears,
        FactField::PropertyValue,
        FactField::LoanAmount,
        FactField::Savings,
        FactField::Age,
    ];

    pub(crate) const fn aggregation(self) -> Aggregation {
        match self {
            FactField::MonthlyDebt => Aggregation::SumAll,
            _ => Aggregation::FirstMatch,
        }
    }
}

/// How multiple pattern hits for one field combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Aggregation {
    /// Alternatives are tried in order; the first one that matches and parses wins.
    FirstMatch,
    /// Every hit of every alternative is summed (itemised debts).
    SumAll,
}

/// Interpretation applied to the first capture group of a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ValueParser {
    /// Currency amount with optional thousands separators.
    Amount,
    /// Plain whole number such as a count of years.
    Count,
    /// Two digits are an age, four digits a birth year.
    AgeOrBirthYear,
}

pub(crate) struct FieldPattern {
    pub field: FactField,
    pub pattern: &'static str,
    pub parser: ValueParser,
}

/// Ordered pattern cascade. Order within a field is significant for `FirstMatch` fields.
pub(crate) static FIELD_PATTERNS: &[FieldPattern] = &[
    FieldPattern {
        field: FactField::MonthlyIncome,
        pattern: r"(?i)monthly\s+(?:salary|income|earning).*?RM\s*([0-9,]+)",
        parser: ValueParser::Amount,
    },
    FieldPattern {
        field: FactField::MonthlyIncome,
        pattern: r"(?i)income.*?RM\s*([0-9,]+)",
        parser: ValueParser::Amount,
    },
    FieldPattern {
        field: FactField::MonthlyIncome,
        pattern: r"(?i)salary.*?RM\s*([0-9,]+)",
        parser: ValueParser::Amount,
    },
    FieldPattern {
        field: FactField::MonthlyDebt,
        pattern: r"(?i)(?:loan|debt|payment).*?RM\s*([0-9,]+).*?(?:month|monthly)",
        parser: ValueParser::Amount,
    },
    FieldPattern {
        field: FactField::MonthlyDebt,
        pattern: r"(?i)monthly\s+(?:debt|payment|commitment|instal?ment)s?.*?RM\s*([0-9,]+)",
        parser: ValueParser::Amount,
    },
    FieldPattern {
        field: FactField::EmploymentYears,
        pattern: r"(?i)(?:employment|worked|working).*?([0-9]+)\s+years?",
        parser: ValueParser::Count,
    },
    FieldPattern {
        field: FactField::EmploymentYears,
        pattern: r"(?i)([0-9]+)\s+years?.*?(?:employment|experience)",
        parser: ValueParser::Count,
    },
    FieldPattern {
        field: FactField::EmploymentYears,
        pattern: r"(?i)years?\s+(?:with|at)\s+(?:the\s+)?(?:company|employer).*?([0-9]+)\s+years?",
        parser: ValueParser::Count,
    },
    FieldPattern {
        field: FactField::PropertyValue,
        pattern: r"(?i)property\s+value.*?RM\s*([0-9,]+)",
        parser: ValueParser::Amount,
    },
    FieldPattern {
        field: FactField::PropertyValue,
        pattern: r"(?i)valuation.*?RM\s*([0-9,]+)",
        parser: ValueParser::Amount,
    },
    FieldPattern {
        field: FactField::PropertyValue,
        pattern: r"(?i)purchase\s+price.*?RM\s*([0-9,]+)",
        parser: ValueParser::Amount,
    },
    FieldPattern {
        field: FactField::LoanAmount,
        pattern: r"(?i)loan\s+amount.*?RM\s*([0-9,]+)",
        parser: ValueParser::Amount,
    },
    FieldPattern {
        field: FactField::LoanAmount,
        pattern: r"(?i)financing.*?RM\s*([0-9,]+)",
        parser: ValueParser::Amount,
    },
    FieldPattern {
        field: FactField::LoanAmount,
        pattern: r"(?i)requested.*?RM\s*([0-9,]+)",
        parser: ValueParser::Amount,
    },
    FieldPattern {
        field: FactField::Savings,
        pattern: r"(?i)savings.*?RM\s*([0-9,]+)",
        parser: ValueParser::Amount,
    },
    FieldPattern {
        field: FactField::Savings,
        pattern: r"(?i)bank\s+balance.*?RM\s*([0-9,]+)",
        parser: ValueParser::Amount,
    },
    FieldPattern {
        field: FactField::Savings,
        pattern: r"(?i)assets?.*?RM\s*([0-9,]+)",
        parser: ValueParser::Amount,
    },
    FieldPattern {
        field: FactField::Age,
        pattern: r"(?i)\bage\b[^0-9\n]*([0-9]{2})\b",
        parser: ValueParser::AgeOrBirthYear,
    },
    FieldPattern {
        field: FactField::Age,
        pattern: r"(?i)\b([0-9]{2})\s+years?\s+old\b",
        parser: ValueParser::AgeOrBirthYear,
    },
    FieldPattern {
        field: FactField::Age,
        pattern: r"(?i)(?:date\s+of\s+birth|\bdob\b).*?[0-9]{1,2}[-/.][0-9]{1,2}[-/.]([0-9]{4})\b",
        parser: ValueParser::AgeOrBirthYear,
    },
    FieldPattern {
        field: FactField::Age,
        pattern: r"(?i)\bborn\b.*?([0-9]{4})\b",
        parser: ValueParser::AgeOrBirthYear,
    },
];
