use std::fmt;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rust_decimal::Decimal;
use sea_orm::{DbErr, RuntimeErr};
use serde::Serialize;
use sqlx::error::ErrorKind;
use thiserror::Error;
use utoipa::ToSchema;

use crate::response::{ApiResponse, Meta};

/// Which relational constraint rejected a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintKind {
    Unique,
    ForeignKey,
    Check,
    NotNull,
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConstraintKind::Unique => "unique",
            ConstraintKind::ForeignKey => "foreign key",
            ConstraintKind::Check => "check",
            ConstraintKind::NotNull => "not null",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not Found")]
    NotFound,

    #[error("Bad Request {0}")]
    BadRequest(String),

    #[error("{kind} constraint violated: {message}")]
    Constraint {
        kind: ConstraintKind,
        message: String,
    },

    #[error("{table}: key {key} maps to conflicting attribute values")]
    FunctionalDependency { table: &'static str, key: String },

    #[error("order {order_id}, product {product_id}: total {actual} is not quantity x price = {expected}")]
    LineTotal {
        order_id: i32,
        product_id: String,
        expected: Decimal,
        actual: Decimal,
    },

    #[error("{table}.{column} references missing row {value}")]
    DanglingReference {
        table: &'static str,
        column: &'static str,
        value: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("CSV error")]
    Csv(#[from] csv::Error),

    #[error("IO error")]
    Io(#[from] std::io::Error),

    #[error("Database error")]
    DbError(sqlx::Error),

    #[error("ORM error")]
    OrmError(DbErr),

    #[error("Internal Server Error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn constraint_kind(&self) -> Option<ConstraintKind> {
        match self {
            AppError::Constraint { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match classify(&err) {
            Some((kind, message)) => AppError::Constraint { kind, message },
            None => AppError::DbError(err),
        }
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        let inner = match &err {
            DbErr::Exec(RuntimeErr::SqlxError(e))
            | DbErr::Query(RuntimeErr::SqlxError(e))
            | DbErr::Conn(RuntimeErr::SqlxError(e)) => classify(e),
            _ => None,
        };
        match inner {
            Some((kind, message)) => AppError::Constraint { kind, message },
            None => AppError::OrmError(err),
        }
    }
}

fn classify(err: &sqlx::Error) -> Option<(ConstraintKind, String)> {
    let db_err = err.as_database_error()?;
    let kind = match db_err.kind() {
        ErrorKind::UniqueViolation => ConstraintKind::Unique,
        ErrorKind::ForeignKeyViolation => ConstraintKind::ForeignKey,
        ErrorKind::CheckViolation => ConstraintKind::Check,
        ErrorKind::NotNullViolation => ConstraintKind::NotNull,
        _ => return None,
    };
    Some((kind, db_err.message().to_string()))
}

#[derive(Serialize)]
struct ErrorData {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Constraint { .. } => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let message = self.to_string();

        let body = ApiResponse {
            message: message.clone(),
            data: Some(ErrorData { error: message }),
            meta: Some(Meta::empty()),
        };

        (status, axum::Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
