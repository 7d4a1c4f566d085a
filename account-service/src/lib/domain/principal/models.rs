use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::principal::errors::AccountIdError;
use crate::domain::principal::errors::AgeError;
use crate::domain::principal::errors::EmailError;
use crate::domain::principal::errors::PasswordError;
use crate::domain::principal::errors::PrincipalError;
use crate::domain::principal::errors::RoleError;
use crate::domain::principal::errors::UserIdError;
use crate::domain::principal::errors::UsernameError;

/// An authenticated actor: something with a username, a stored credential and a role.
///
/// Implemented by [`Account`] and [`User`]. Session orchestration is generic
/// over this trait so both principal kinds share one login pipeline.
pub trait Principal: Clone + Send + Sync + 'static {
    type Id: Copy + fmt::Display + fmt::Debug + PartialEq + Send + Sync + 'static;
    type Registration: RegistrationCommand;

    fn id(&self) -> Self::Id;
    fn username(&self) -> &Username;
    fn password_hash(&self) -> &str;
    fn role(&self) -> Role;
    fn reference(&self) -> PrincipalRef;
}

/// Validated input for creating a principal.
pub trait RegistrationCommand: fmt::Debug + Send + Sync + 'static {
    fn username(&self) -> &Username;
    fn password(&self) -> &Password;
}

/// Typed reference to either principal kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrincipalRef {
    Account(AccountId),
    User(UserId),
}

impl fmt::Display for PrincipalRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrincipalRef::Account(id) => write!(f, "account:{}", id),
            PrincipalRef::User(id) => write!(f, "user:{}", id),
        }
    }
}

/// Administrative account.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: AccountId,
    pub username: Username,
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Principal for Account {
    type Id = AccountId;
    type Registration = CreateAccountCommand;

    fn id(&self) -> AccountId {
        self.id
    }

    fn username(&self) -> &Username {
        &self.username
    }

    fn password_hash(&self) -> &str {
        &self.password_hash
    }

    fn role(&self) -> Role {
        self.role
    }

    fn reference(&self) -> PrincipalRef {
        PrincipalRef::Account(self.id)
    }
}

/// Registered end user; owner of photos, comments and social media links.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub username: Username,
    pub email: EmailAddress,
    pub password_hash: String,
    pub age: Age,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Principal for User {
    type Id = UserId;
    type Registration = RegisterUserCommand;

    fn id(&self) -> UserId {
        self.id
    }

    fn username(&self) -> &Username {
        &self.username
    }

    fn password_hash(&self) -> &str {
        &self.password_hash
    }

    /// Users always act with the normal role.
    fn role(&self) -> Role {
        Role::Normal
    }

    fn reference(&self) -> PrincipalRef {
        PrincipalRef::User(self.id)
    }
}

/// Account unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AccountId(pub Uuid);

impl AccountId {
    /// Generate a new random account ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an account ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, AccountIdError> {
        Uuid::parse_str(s)
            .map(AccountId)
            .map_err(|e| AccountIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for AccountId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// User identifier assigned by storage; rendered in decimal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(pub u64);

impl UserId {
    /// Parse a user ID from its decimal form.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not an unsigned integer
    pub fn from_string(s: &str) -> Result<Self, UserIdError> {
        s.parse::<u64>()
            .map(UserId)
            .map_err(|_| UserIdError::InvalidFormat(s.to_string()))
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Username value type
///
/// Non-empty, at most 64 characters, no whitespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Username(String);

impl Username {
    const MAX_LENGTH: usize = 64;

    /// Create a new valid username.
    ///
    /// # Errors
    /// * `Empty` - Username is empty
    /// * `TooLong` - Username longer than 64 characters
    /// * `InvalidCharacters` - Username contains whitespace
    pub fn new(username: String) -> Result<Self, UsernameError> {
        let length = username.chars().count();
        if length == 0 {
            Err(UsernameError::Empty)
        } else if length > Self::MAX_LENGTH {
            Err(UsernameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else if username.chars().any(char::is_whitespace) {
            Err(UsernameError::InvalidCharacters)
        } else {
            Ok(Self(username))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Validates email format using RFC 5322 compliant parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated email address.
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Plaintext password that satisfies the password policy.
///
/// Only lives between request parsing and hashing. `Debug` is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    pub const MIN_LENGTH: usize = 6;

    /// # Errors
    /// * `TooShort` - Fewer than 6 characters
    pub fn new(password: String) -> Result<Self, PasswordError> {
        let length = password.chars().count();
        if length < Self::MIN_LENGTH {
            return Err(PasswordError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            });
        }
        Ok(Self(password))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

/// Age in years; must be greater than 8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Age(u64);

impl Age {
    pub const MINIMUM_EXCLUSIVE: u64 = 8;

    /// # Errors
    /// * `TooYoung` - Age is 8 or less
    pub fn new(age: u64) -> Result<Self, AgeError> {
        if age <= Self::MINIMUM_EXCLUSIVE {
            return Err(AgeError::TooYoung {
                min: Self::MINIMUM_EXCLUSIVE,
                actual: age,
            });
        }
        Ok(Self(age))
    }

    /// Parse an age from its decimal form.
    ///
    /// # Errors
    /// * `NotANumber` - Not an unsigned integer
    /// * `TooYoung` - Age is 8 or less
    pub fn parse(raw: &str) -> Result<Self, AgeError> {
        let age = raw
            .trim()
            .parse::<u64>()
            .map_err(|_| AgeError::NotANumber(raw.to_string()))?;
        Self::new(age)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Principal role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Role {
    Admin,
    #[default]
    Normal,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Normal => "normal",
        }
    }
}

impl FromStr for Role {
    type Err = RoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "normal" => Ok(Role::Normal),
            _ => Err(RoleError::Unknown(s.to_string())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns the names of every blank field, in the order given.
fn blank_fields(fields: &[(&'static str, &str)]) -> Vec<&'static str> {
    fields
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
        .collect()
}

/// Command to create a new account with domain types
#[derive(Debug)]
pub struct CreateAccountCommand {
    pub username: Username,
    pub password: Password,
    pub role: Role,
}

impl CreateAccountCommand {
    /// Validate raw account fields.
    ///
    /// A blank role defaults to `normal`.
    ///
    /// # Errors
    /// * `EmptyFields` - Username or password is blank
    /// * `InvalidPassword` - Password shorter than 6 characters
    /// * `InvalidRole` - Role is neither admin nor normal
    /// * `InvalidUsername` - Username is malformed
    pub fn new(username: String, password: String, role: String) -> Result<Self, PrincipalError> {
        let empty = blank_fields(&[
            ("username", username.as_str()),
            ("password", password.as_str()),
        ]);
        if !empty.is_empty() {
            return Err(PrincipalError::EmptyFields(empty));
        }

        let password = Password::new(password)?;
        let role = if role.trim().is_empty() {
            Role::default()
        } else {
            role.parse::<Role>()?
        };
        let username = Username::new(username)?;

        Ok(Self {
            username,
            password,
            role,
        })
    }
}

impl RegistrationCommand for CreateAccountCommand {
    fn username(&self) -> &Username {
        &self.username
    }

    fn password(&self) -> &Password {
        &self.password
    }
}

/// Command to register a new user with domain types
#[derive(Debug)]
pub struct RegisterUserCommand {
    pub username: Username,
    pub email: EmailAddress,
    pub password: Password,
    pub age: Age,
}

impl RegisterUserCommand {
    /// Validate raw registration fields.
    ///
    /// Checks run in a fixed order: blank fields (all reported at once),
    /// password length, age, email format and finally username shape.
    ///
    /// # Errors
    /// * `EmptyFields` - One or more fields are blank
    /// * `InvalidPassword` - Password shorter than 6 characters
    /// * `InvalidAge` - Age is not a number or is 8 or less
    /// * `InvalidEmail` - Email is syntactically invalid
    /// * `InvalidUsername` - Username is malformed
    pub fn new(
        username: String,
        email: String,
        password: String,
        age: String,
    ) -> Result<Self, PrincipalError> {
        let empty = blank_fields(&[
            ("email", email.as_str()),
            ("username", username.as_str()),
            ("password", password.as_str()),
            ("age", age.as_str()),
        ]);
        if !empty.is_empty() {
            return Err(PrincipalError::EmptyFields(empty));
        }

        let password = Password::new(password)?;
        let age = Age::parse(&age)?;
        let email = EmailAddress::new(email)?;
        let username = Username::new(username)?;

        Ok(Self {
            username,
            email,
            password,
            age,
        })
    }
}

impl RegistrationCommand for RegisterUserCommand {
    fn username(&self) -> &Username {
        &self.username
    }

    fn password(&self) -> &Password {
        &self.password
    }
}

/// Login credentials as submitted.
///
/// The username is not shape-validated: an unknown or malformed username and
/// a wrong password must be indistinguishable to the caller.
#[derive(Clone)]
pub struct LoginCommand {
    username: String,
    password: String,
}

impl LoginCommand {
    /// # Errors
    /// * `EmptyFields` - Username or password is blank
    pub fn new(username: String, password: String) -> Result<Self, PrincipalError> {
        let empty = blank_fields(&[
            ("username", username.as_str()),
            ("password", password.as_str()),
        ]);
        if !empty.is_empty() {
            return Err(PrincipalError::EmptyFields(empty));
        }
        Ok(Self { username, password })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for LoginCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCommand")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}
