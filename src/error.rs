//! Error types for the solar_defect_mapper library

use thiserror::Error;

/// Result type alias for solar_defect_mapper operations
pub type Result<T> = std::result::Result<T, InspectionError>;

/// Error types for panel mapping, geocoding and export operations
#[derive(Error, Debug)]
pub enum InspectionError {
    /// Bounding box geometry violates its invariants
    #[error("Invalid bounding box: {field} = {value}")]
    InvalidBoundingBox { field: String, value: i64 },

    /// Invalid input parameters
    #[error("Invalid parameter: {parameter} = {value}")]
    InvalidParameter { parameter: String, value: String },

    /// CRS descriptor could not be understood
    #[error("Could not parse CRS '{input}': {reason}")]
    CrsParseError { input: String, reason: String },

    /// Projection setup or point reprojection failed
    #[error("Projection error: {message}")]
    ProjectionError { message: String },

    /// Defect labels file could not be read or parsed
    #[error("Failed to load defect labels: {message}")]
    LabelsError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration could not be read, parsed or written
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Metrics export failed
    #[error("Export error: {message}")]
    ExportError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl InspectionError {
    /// Create a bounding box validation error
    pub fn invalid_bbox(field: impl Into<String>, value: i64) -> Self {
        Self::InvalidBoundingBox {
            field: field.into(),
            value,
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter(parameter: impl Into<String>, value: impl ToString) -> Self {
        Self::InvalidParameter {
            parameter: parameter.into(),
            value: value.to_string(),
        }
    }

    /// Create a CRS parse error
    pub fn crs_parse(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::CrsParseError {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Create a projection error
    pub fn projection(message: impl Into<String>) -> Self {
        Self::ProjectionError {
            message: message.into(),
        }
    }

    /// Create a labels loading error with context
    pub fn labels<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::LabelsError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a configuration error with context
    pub fn config<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ConfigError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an export error with context
    pub fn export<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ExportError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Check if this error indicates a degrade-and-continue condition
    ///
    /// Geocoding is advisory metadata, so CRS and projection failures never
    /// abort a mapping run.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            InspectionError::CrsParseError { .. } | InspectionError::ProjectionError { .. }
        )
    }

    /// Get operator-facing error description
    pub fn user_message(&self) -> String {
        match self {
            InspectionError::InvalidBoundingBox { field, value } => format!(
                "A detection has invalid geometry ({} = {}). Please check the labels file.",
                field, value
            ),
            InspectionError::LabelsError { .. } => {
                "Could not read the defect labels. Please check the file format and try again."
                    .to_string()
            }
            InspectionError::CrsParseError { input, .. } => format!(
                "The orthophoto coordinate system '{}' is not supported; coordinates assume WGS84.",
                input
            ),
            InspectionError::ConfigError { .. } => {
                "Could not load the inspection configuration.".to_string()
            }
            _ => "Defect mapping failed. Please check the inputs and try again.".to_string(),
        }
    }
}
