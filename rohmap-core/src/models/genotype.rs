use std::fmt::{self, Display};
use std::str::FromStr;

///
/// A single SNP genotype observation.
///
#[derive(Eq, PartialEq, Hash, Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Genotype {
    HomozygousA,
    HomozygousB,
    Heterozygous,
    NoCall,
}

impl Genotype {
    /// `AA` or `BB`.
    #[inline]
    pub fn is_homozygous(&self) -> bool {
        matches!(self, Genotype::HomozygousA | Genotype::HomozygousB)
    }

    #[inline]
    pub fn is_heterozygous(&self) -> bool {
        matches!(self, Genotype::Heterozygous)
    }

    /// Anything other than a failed call.
    #[inline]
    pub fn is_called(&self) -> bool {
        !matches!(self, Genotype::NoCall)
    }

    pub fn as_code(&self) -> &'static str {
        match self {
            Genotype::HomozygousA => "AA",
            Genotype::HomozygousB => "BB",
            Genotype::Heterozygous => "AB",
            Genotype::NoCall => "NoCall",
        }
    }
}

impl FromStr for Genotype {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "aa" => Ok(Genotype::HomozygousA),
            "bb" => Ok(Genotype::HomozygousB),
            "ab" | "ba" => Ok(Genotype::Heterozygous),
            "nocall" | "no call" | "nc" | "--" => Ok(Genotype::NoCall),
            _ => Err(format!("Unrecognised call code: {}", s)),
        }
    }
}

impl Display for Genotype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_code())
    }
}

///
/// GenotypeCall struct, one row of a sample's genotype table.
///
/// `confidence` is an error probability, so lower values are better.
///
#[derive(PartialEq, Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GenotypeCall {
    pub chrom: String,
    pub position: u32,
    pub id: String,
    pub genotype: Genotype,
    pub confidence: Option<f64>,
}

impl GenotypeCall {
    pub fn new(chrom: &str, position: u32, id: &str, genotype: Genotype) -> Self {
        GenotypeCall {
            chrom: chrom.to_string(),
            position,
            id: id.to_string(),
            genotype,
            confidence: None,
        }
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }

    #[inline]
    pub fn is_called(&self) -> bool {
        self.genotype.is_called()
    }

    #[inline]
    pub fn is_heterozygous(&self) -> bool {
        self.genotype.is_heterozygous()
    }

    #[inline]
    pub fn is_homozygous(&self) -> bool {
        self.genotype.is_homozygous()
    }
}
