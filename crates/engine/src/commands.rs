//! Command structs for engine operations.
//!
//! These carry the already-decoded request fields into the engine. Required
//! fields are still `Option`s: a missing value is a validation failure
//! reported next to the others, not a parse error.
//!
//! On update commands every `None` means "keep the current value". The club
//! reference of players and coaches is tri-state: `None` keeps it,
//! `Some(None)` detaches the entity, `Some(Some(code))` moves it.

/// Create a club.
#[derive(Clone, Debug, Default)]
pub struct ClubNewCmd {
    pub code: Option<String>,
    pub name: Option<String>,
    pub founded: Option<i64>,
    pub city: Option<String>,
    pub stadium: Option<String>,
    pub budget: Option<String>,
}

impl ClubNewCmd {
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        founded: i64,
        city: impl Into<String>,
        stadium: impl Into<String>,
        budget: impl Into<String>,
    ) -> Self {
        Self {
            code: Some(code.into()),
            name: Some(name.into()),
            founded: Some(founded),
            city: Some(city.into()),
            stadium: Some(stadium.into()),
            budget: Some(budget.into()),
        }
    }
}

/// Update a club in place.
///
/// `code` may be sent but must match the current code.
#[derive(Clone, Debug, Default)]
pub struct ClubUpdateCmd {
    pub code: Option<String>,
    pub name: Option<String>,
    pub founded: Option<i64>,
    pub city: Option<String>,
    pub stadium: Option<String>,
    pub budget: Option<String>,
}

impl ClubUpdateCmd {
    #[must_use]
    pub fn budget(mut self, budget: impl Into<String>) -> Self {
        self.budget = Some(budget.into());
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_none()
            && self.name.is_none()
            && self.founded.is_none()
            && self.city.is_none()
            && self.stadium.is_none()
            && self.budget.is_none()
    }
}

/// Create a player, optionally inside a club.
#[derive(Clone, Debug, Default)]
pub struct PlayerNewCmd {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub shirt_number: Option<i64>,
    pub salary: Option<String>,
    pub club: Option<String>,
}

impl PlayerNewCmd {
    #[must_use]
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        shirt_number: i64,
        salary: impl Into<String>,
    ) -> Self {
        Self {
            first_name: Some(first_name.into()),
            last_name: Some(last_name.into()),
            shirt_number: Some(shirt_number),
            salary: Some(salary.into()),
            club: None,
        }
    }

    #[must_use]
    pub fn club(mut self, code: impl Into<String>) -> Self {
        self.club = Some(code.into());
        self
    }
}

/// Update a player in place; a club change is a transfer.
#[derive(Clone, Debug, Default)]
pub struct PlayerUpdateCmd {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub shirt_number: Option<i64>,
    pub salary: Option<String>,
    pub club: Option<Option<String>>,
}

impl PlayerUpdateCmd {
    #[must_use]
    pub fn salary(mut self, salary: impl Into<String>) -> Self {
        self.salary = Some(salary.into());
        self
    }

    #[must_use]
    pub fn shirt_number(mut self, number: i64) -> Self {
        self.shirt_number = Some(number);
        self
    }

    #[must_use]
    pub fn transfer_to(mut self, code: impl Into<String>) -> Self {
        self.club = Some(Some(code.into()));
        self
    }

    #[must_use]
    pub fn release(mut self) -> Self {
        self.club = Some(None);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.shirt_number.is_none()
            && self.salary.is_none()
            && self.club.is_none()
    }
}

/// Create a coach, optionally inside a club.
#[derive(Clone, Debug, Default)]
pub struct CoachNewCmd {
    pub national_id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub salary: Option<String>,
    pub club: Option<String>,
}

impl CoachNewCmd {
    #[must_use]
    pub fn new(
        national_id: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        salary: impl Into<String>,
    ) -> Self {
        Self {
            national_id: Some(national_id.into()),
            first_name: Some(first_name.into()),
            last_name: Some(last_name.into()),
            salary: Some(salary.into()),
            club: None,
        }
    }

    #[must_use]
    pub fn club(mut self, code: impl Into<String>) -> Self {
        self.club = Some(code.into());
        self
    }
}

/// Update a coach in place; a club change is a transfer.
///
/// `national_id` may be sent but must match the current one.
#[derive(Clone, Debug, Default)]
pub struct CoachUpdateCmd {
    pub national_id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub salary: Option<String>,
    pub club: Option<Option<String>>,
}

impl CoachUpdateCmd {
    #[must_use]
    pub fn salary(mut self, salary: impl Into<String>) -> Self {
        self.salary = Some(salary.into());
        self
    }

    #[must_use]
    pub fn transfer_to(mut self, code: impl Into<String>) -> Self {
        self.club = Some(Some(code.into()));
        self
    }

    #[must_use]
    pub fn release(mut self) -> Self {
        self.club = Some(None);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.national_id.is_none()
            && self.first_name.is_none()
            && self.last_name.is_none()
            && self.salary.is_none()
            && self.club.is_none()
    }
}

/// Filter and page selection for listings.
#[derive(Clone, Debug)]
pub struct ListFilter {
    /// Case-insensitive "name contains".
    pub name: Option<String>,
    /// Only entities of this club (players and coaches).
    pub club: Option<String>,
    /// 1-based.
    pub page: u64,
    pub page_size: u64,
}

impl ListFilter {
    pub const DEFAULT_PAGE_SIZE: u64 = 5;
    pub const MAX_PAGE_SIZE: u64 = 100;

    #[must_use]
    pub fn page(mut self, page: u64) -> Self {
        self.page = page;
        self
    }

    #[must_use]
    pub fn page_size(mut self, page_size: u64) -> Self {
        self.page_size = page_size;
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn club(mut self, code: impl Into<String>) -> Self {
        self.club = Some(code.into());
        self
    }

    pub(crate) fn clamped(&self) -> (u64, u64) {
        (
            self.page.max(1),
            self.page_size.clamp(1, Self::MAX_PAGE_SIZE),
        )
    }
}

impl Default for ListFilter {
    fn default() -> Self {
        Self {
            name: None,
            club: None,
            page: 1,
            page_size: Self::DEFAULT_PAGE_SIZE,
        }
    }
}
