//! User model, roles and access tiers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::ToSchema;
use validator::Validate;

use crate::error::AppError;

/// User role, ordered by privilege: admin capabilities include librarian
/// capabilities, which include member capabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Member,
    Librarian,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Member => "member",
            Role::Librarian => "librarian",
            Role::Admin => "admin",
        }
    }

    /// Whether a caller holding this role may perform operations gated at
    /// `tier`. Every role belongs to an authenticated, existing user, so
    /// the two lower tiers are always satisfied.
    pub fn satisfies(&self, tier: Tier) -> bool {
        match tier {
            Tier::Anonymous | Tier::Authenticated => true,
            Tier::Librarian => *self >= Role::Librarian,
            Tier::Admin => *self >= Role::Admin,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "member" => Ok(Role::Member),
            "librarian" => Ok(Role::Librarian),
            "admin" => Ok(Role::Admin),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}

// SQLx conversion for Role (stored as text)
impl sqlx::Type<Postgres> for Role {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for Role {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for Role {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        let s: String = self.as_str().to_string();
        <String as Encode<Postgres>>::encode(s, buf)
    }
}

/// Capability tier gating an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Tier {
    Anonymous,
    Authenticated,
    Librarian,
    Admin,
}

impl Tier {
    fn privilege_name(&self) -> &'static str {
        match self {
            Tier::Anonymous => "no",
            Tier::Authenticated => "Member",
            Tier::Librarian => "Librarian",
            Tier::Admin => "Administrator",
        }
    }
}

/// Resolved caller identity, threaded explicitly through every service
/// operation that needs authorization.
#[derive(Debug, Clone, Copy)]
pub struct Caller {
    pub user_id: i32,
    pub role: Role,
}

impl Caller {
    /// Pure authorization predicate over the tier ladder.
    pub fn authorize(&self, tier: Tier) -> Result<(), AppError> {
        if self.role.satisfies(tier) {
            Ok(())
        } else {
            Err(AppError::Forbidden(format!(
                "{} privileges required",
                tier.privilege_name()
            )))
        }
    }

    pub fn require_librarian(&self) -> Result<(), AppError> {
        self.authorize(Tier::Librarian)
    }

    pub fn require_admin(&self) -> Result<(), AppError> {
        self.authorize(Tier::Admin)
    }
}

/// Full user model from database
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    /// Hashed password (argon2)
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// Signup request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct Signup {
    #[validate(length(min = 1, message = "Name cannot be blank"))]
    pub name: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct Login {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password cannot be blank"))]
    pub password: String,
}

/// Change own password request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ChangePassword {
    pub current_password: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub new_password: String,
}

/// JWT claims carried by the bearer token.
///
/// The token binds identity only. The current role is re-read from storage
/// by the access gate on every tier-gated request, so promotions apply
/// immediately and a token never outlives its account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub user_id: i32,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse and validate a JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_are_ordered_by_privilege() {
        assert!(Role::Member < Role::Librarian);
        assert!(Role::Librarian < Role::Admin);
    }

    #[test]
    fn tier_ladder_widens_strictly() {
        // member: only the two lower tiers
        assert!(Role::Member.satisfies(Tier::Anonymous));
        assert!(Role::Member.satisfies(Tier::Authenticated));
        assert!(!Role::Member.satisfies(Tier::Librarian));
        assert!(!Role::Member.satisfies(Tier::Admin));

        // librarian: everything but admin
        assert!(Role::Librarian.satisfies(Tier::Authenticated));
        assert!(Role::Librarian.satisfies(Tier::Librarian));
        assert!(!Role::Librarian.satisfies(Tier::Admin));

        // admin: everything
        assert!(Role::Admin.satisfies(Tier::Librarian));
        assert!(Role::Admin.satisfies(Tier::Admin));
    }

    #[test]
    fn authorize_rejects_below_tier() {
        let member = Caller {
            user_id: 1,
            role: Role::Member,
        };
        assert!(member.authorize(Tier::Authenticated).is_ok());
        assert!(matches!(
            member.require_librarian(),
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(member.require_admin(), Err(AppError::Forbidden(_))));

        let admin = Caller {
            user_id: 2,
            role: Role::Admin,
        };
        assert!(admin.require_librarian().is_ok());
        assert!(admin.require_admin().is_ok());
    }

    #[test]
    fn role_round_trips_through_text() {
        for role in [Role::Member, Role::Librarian, Role::Admin] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
        assert!("superuser".parse::<Role>().is_err());
    }

    #[test]
    fn claims_round_trip_through_token() {
        let claims = Claims {
            sub: "reader@example.com".to_string(),
            user_id: 7,
            exp: chrono::Utc::now().timestamp() + 3600,
            iat: chrono::Utc::now().timestamp(),
        };
        let token = claims.create_token("test-secret").unwrap();
        let decoded = Claims::from_token(&token, "test-secret").unwrap();
        assert_eq!(decoded.user_id, 7);
        assert_eq!(decoded.sub, "reader@example.com");

        assert!(Claims::from_token(&token, "other-secret").is_err());
    }
}
