//! Assignment validator.
//!
//! Every check here is pure: the orchestrator loads a snapshot of the
//! affected clubs inside its transaction, hands it over, and only writes if
//! the returned entity is `Ok`. Independent failures are all collected;
//! checks that need an earlier one to pass (a club lookup before its budget,
//! a valid salary before a budget comparison) are skipped instead.

use uuid::Uuid;

use crate::{
    Club, ClubNewCmd, ClubRoster, ClubUpdateCmd, Coach, CoachNewCmd, CoachUpdateCmd, Money,
    Player, PlayerNewCmd, PlayerUpdateCmd, ValidationRules, Violations, field,
};

/// The club a create/update would leave the entity in.
#[derive(Clone, Copy, Debug)]
pub enum Target<'a> {
    /// No club.
    Unassigned,
    /// A club code that does not exist.
    Missing(&'a str),
    /// An existing club, with its current roster.
    Club(&'a ClubRoster),
}

impl<'a> Target<'a> {
    pub fn code(&self) -> Option<&'a str> {
        match *self {
            Self::Unassigned => None,
            Self::Missing(code) => Some(code),
            Self::Club(roster) => Some(roster.club.code.as_str()),
        }
    }
}

/// What an entity occupies in a club besides its salary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Seat {
    Player { shirt_number: i32 },
    Coach,
}

/// An entity being placed in (or kept in) a club.
#[derive(Clone, Copy, Debug)]
pub struct Member {
    /// `None` while the entity is still being created.
    pub id: Option<Uuid>,
    pub seat: Seat,
    pub salary: Money,
}

impl Member {
    pub fn player(player: &Player) -> Self {
        Self {
            id: Some(player.id),
            seat: Seat::Player {
                shirt_number: player.shirt_number,
            },
            salary: player.salary,
        }
    }

    pub fn coach(coach: &Coach) -> Self {
        Self {
            id: Some(coach.id),
            seat: Seat::Coach,
            salary: coach.salary,
        }
    }
}

/// Uniqueness facts looked up by the orchestrator before validating a club.
#[derive(Clone, Copy, Debug, Default)]
pub struct Taken {
    pub code: bool,
    pub name: bool,
}

impl ValidationRules {
    pub fn validate_create_club(
        &self,
        cmd: &ClubNewCmd,
        taken: Taken,
        current_year: i32,
    ) -> Result<Club, Violations> {
        let mut v = Violations::new();
        let code = v.check(field::CLUB, self.check_code(cmd.code.as_deref()));
        if code.is_some() && taken.code {
            v.uniqueness(field::CLUB, "club code is already in use");
        }
        let name = v.check(
            field::NAME,
            self.check_place_text(cmd.name.as_deref(), "club name"),
        );
        if name.is_some() && taken.name {
            v.uniqueness(field::NAME, "club name is already in use");
        }
        let founded = v.check(
            field::FOUNDED,
            self.check_founding_year(cmd.founded, current_year),
        );
        let city = v.check(field::CITY, self.check_place_text(cmd.city.as_deref(), "city"));
        let stadium = v.check(
            field::STADIUM,
            self.check_place_text(cmd.stadium.as_deref(), "stadium"),
        );
        let budget = v.check(
            field::BUDGET,
            self.check_amount(cmd.budget.as_deref(), "budget"),
        );

        match (code, name, founded, city, stadium, budget) {
            (Some(code), Some(name), Some(founded), Some(city), Some(stadium), Some(budget))
                if v.is_empty() =>
            {
                Ok(Club::new(code, name, founded, city, stadium, budget))
            }
            _ => Err(v),
        }
    }

    /// `name_taken` must already exclude the club itself.
    pub fn validate_update_club(
        &self,
        current: &ClubRoster,
        cmd: &ClubUpdateCmd,
        name_taken: bool,
        current_year: i32,
    ) -> Result<Club, Violations> {
        let mut v = Violations::new();
        let mut club = current.club.clone();

        if let Some(code) = cmd.code.as_deref()
            && code != club.code
        {
            v.structural(field::CLUB, "club code cannot be changed");
        }
        if cmd.name.is_some()
            && let Some(name) = v.check(
                field::NAME,
                self.check_place_text(cmd.name.as_deref(), "club name"),
            )
        {
            if name_taken {
                v.uniqueness(field::NAME, "club name is already in use");
            }
            club.name = name;
        }
        if cmd.founded.is_some()
            && let Some(founded) = v.check(
                field::FOUNDED,
                self.check_founding_year(cmd.founded, current_year),
            )
        {
            club.founded = founded;
        }
        if cmd.city.is_some()
            && let Some(city) = v.check(field::CITY, self.check_place_text(cmd.city.as_deref(), "city"))
        {
            club.city = city;
        }
        if cmd.stadium.is_some()
            && let Some(stadium) = v.check(
                field::STADIUM,
                self.check_place_text(cmd.stadium.as_deref(), "stadium"),
            )
        {
            club.stadium = stadium;
        }
        if cmd.budget.is_some()
            && let Some(budget) = v.check(
                field::BUDGET,
                self.check_amount(cmd.budget.as_deref(), "budget"),
            )
        {
            self.check_budget_cover(&mut v, current, budget);
            club.budget = budget;
        }

        if v.is_empty() { Ok(club) } else { Err(v) }
    }

    pub fn validate_create_player(
        &self,
        cmd: &PlayerNewCmd,
        target: Target<'_>,
    ) -> Result<Player, Violations> {
        let mut v = Violations::new();
        let first_name = v.check(
            field::NAME,
            self.check_person_name(cmd.first_name.as_deref(), "first name"),
        );
        let last_name = v.check(
            field::SURNAME,
            self.check_person_name(cmd.last_name.as_deref(), "last name"),
        );
        let shirt_number = v.check(
            field::SHIRT_NUMBER,
            self.check_shirt_number(cmd.shirt_number),
        );
        let salary = v.check(
            field::SALARY,
            self.check_amount(cmd.salary.as_deref(), "salary"),
        );

        let club = self.check_target(&mut v, target);
        if let Target::Club(roster) = target {
            if let Some(shirt_number) = shirt_number {
                self.check_seat(&mut v, roster, None, Seat::Player { shirt_number });
            }
            if let Some(salary) = salary {
                self.check_budget(&mut v, roster, None, salary);
            }
        }

        match (first_name, last_name, shirt_number, salary) {
            (Some(first_name), Some(last_name), Some(shirt_number), Some(salary))
                if v.is_empty() =>
            {
                Ok(Player::new(first_name, last_name, shirt_number, salary, club))
            }
            _ => Err(v),
        }
    }

    /// `target` is the club the player ends up in: the current one when the
    /// command leaves the club untouched.
    pub fn validate_update_player(
        &self,
        current: &Player,
        cmd: &PlayerUpdateCmd,
        target: Target<'_>,
    ) -> Result<Player, Violations> {
        let mut v = Violations::new();
        let mut player = current.clone();

        if cmd.first_name.is_some()
            && let Some(name) = v.check(
                field::NAME,
                self.check_person_name(cmd.first_name.as_deref(), "first name"),
            )
        {
            player.first_name = name;
        }
        if cmd.last_name.is_some()
            && let Some(name) = v.check(
                field::SURNAME,
                self.check_person_name(cmd.last_name.as_deref(), "last name"),
            )
        {
            player.last_name = name;
        }
        let shirt_ok = cmd.shirt_number.is_none()
            || match v.check(field::SHIRT_NUMBER, self.check_shirt_number(cmd.shirt_number)) {
                Some(number) => {
                    player.shirt_number = number;
                    true
                }
                None => false,
            };
        let salary_ok = cmd.salary.is_none()
            || match v.check(
                field::SALARY,
                self.check_amount(cmd.salary.as_deref(), "salary"),
            ) {
                Some(salary) => {
                    player.salary = salary;
                    true
                }
                None => false,
            };

        player.club = self.check_target(&mut v, target);
        if let Target::Club(roster) = target {
            let moved = current.club.as_deref() != Some(roster.club.code.as_str());
            let member = Member::player(&player);
            if moved && shirt_ok && salary_ok {
                for (field, violation) in self.validate_transfer(member, roster).iter() {
                    v.push(field, violation.kind, violation.message.clone());
                }
            } else {
                if shirt_ok && (moved || player.shirt_number != current.shirt_number) {
                    self.check_seat(&mut v, roster, member.id, member.seat);
                }
                if salary_ok && (moved || player.salary != current.salary) {
                    for (field, violation) in self.validate_update_salary(member, roster).iter() {
                        v.push(field, violation.kind, violation.message.clone());
                    }
                }
            }
        }

        if v.is_empty() { Ok(player) } else { Err(v) }
    }

    pub fn validate_create_coach(
        &self,
        cmd: &CoachNewCmd,
        national_id_taken: bool,
        target: Target<'_>,
    ) -> Result<Coach, Violations> {
        let mut v = Violations::new();
        let national_id = v.check(
            field::NATIONAL_ID,
            self.check_national_id(cmd.national_id.as_deref()),
        );
        if national_id.is_some() && national_id_taken {
            v.uniqueness(field::NATIONAL_ID, "national id is already registered");
        }
        let first_name = v.check(
            field::NAME,
            self.check_person_name(cmd.first_name.as_deref(), "first name"),
        );
        let last_name = v.check(
            field::SURNAME,
            self.check_person_name(cmd.last_name.as_deref(), "last name"),
        );
        let salary = v.check(
            field::SALARY,
            self.check_amount(cmd.salary.as_deref(), "salary"),
        );

        let club = self.check_target(&mut v, target);
        if let Target::Club(roster) = target {
            self.check_seat(&mut v, roster, None, Seat::Coach);
            if let Some(salary) = salary {
                self.check_budget(&mut v, roster, None, salary);
            }
        }

        match (national_id, first_name, last_name, salary) {
            (Some(national_id), Some(first_name), Some(last_name), Some(salary))
                if v.is_empty() =>
            {
                Ok(Coach::new(national_id, first_name, last_name, salary, club))
            }
            _ => Err(v),
        }
    }

    /// `target` is the club the coach ends up in: the current one when the
    /// command leaves the club untouched.
    pub fn validate_update_coach(
        &self,
        current: &Coach,
        cmd: &CoachUpdateCmd,
        target: Target<'_>,
    ) -> Result<Coach, Violations> {
        let mut v = Violations::new();
        let mut coach = current.clone();

        if let Some(national_id) = cmd.national_id.as_deref()
            && national_id != coach.national_id
        {
            v.structural(field::NATIONAL_ID, "national id cannot be changed");
        }
        if cmd.first_name.is_some()
            && let Some(name) = v.check(
                field::NAME,
                self.check_person_name(cmd.first_name.as_deref(), "first name"),
            )
        {
            coach.first_name = name;
        }
        if cmd.last_name.is_some()
            && let Some(name) = v.check(
                field::SURNAME,
                self.check_person_name(cmd.last_name.as_deref(), "last name"),
            )
        {
            coach.last_name = name;
        }
        let salary_ok = cmd.salary.is_none()
            || match v.check(
                field::SALARY,
                self.check_amount(cmd.salary.as_deref(), "salary"),
            ) {
                Some(salary) => {
                    coach.salary = salary;
                    true
                }
                None => false,
            };

        coach.club = self.check_target(&mut v, target);
        if let Target::Club(roster) = target {
            let moved = current.club.as_deref() != Some(roster.club.code.as_str());
            let member = Member::coach(&coach);
            let violations = if moved {
                let mut transfer = Violations::new();
                self.check_seat(&mut transfer, roster, member.id, member.seat);
                if salary_ok {
                    self.check_budget(&mut transfer, roster, member.id, member.salary);
                }
                transfer
            } else if salary_ok && coach.salary != current.salary {
                self.validate_update_salary(member, roster)
            } else {
                Violations::new()
            };
            for (field, violation) in violations.iter() {
                v.push(field, violation.kind, violation.message.clone());
            }
        }

        if v.is_empty() { Ok(coach) } else { Err(v) }
    }

    /// Re-checks the seat and the budget of `member` against the club it
    /// moves to.
    ///
    /// When the member already belongs to `to` its own salary is handed back
    /// first, so a move within the same club only fails if it would have
    /// failed before.
    pub fn validate_transfer(&self, member: Member, to: &ClubRoster) -> Violations {
        let mut v = Violations::new();
        self.check_seat(&mut v, to, member.id, member.seat);
        self.check_budget(&mut v, to, member.id, member.salary);
        v
    }

    /// Budget check for a salary change inside the member's current club.
    pub fn validate_update_salary(&self, member: Member, club: &ClubRoster) -> Violations {
        let mut v = Violations::new();
        self.check_budget(&mut v, club, member.id, member.salary);
        v
    }

    fn check_target(&self, v: &mut Violations, target: Target<'_>) -> Option<String> {
        match target {
            Target::Unassigned => None,
            Target::Missing(code) => {
                v.structural(field::CLUB, format!("club '{code}' does not exist"));
                None
            }
            Target::Club(roster) => Some(roster.club.code.clone()),
        }
    }

    fn check_seat(&self, v: &mut Violations, roster: &ClubRoster, id: Option<Uuid>, seat: Seat) {
        let code = &roster.club.code;
        match seat {
            Seat::Player { shirt_number } => {
                if roster.shirt_taken(shirt_number, id) {
                    v.uniqueness(
                        field::SHIRT_NUMBER,
                        format!("shirt number {shirt_number} is already used in club '{code}'"),
                    );
                }
            }
            Seat::Coach => {
                if roster.other_coach(id).is_some() {
                    v.uniqueness(
                        field::CLUB,
                        format!("club '{code}' already has a coach assigned"),
                    );
                }
            }
        }
    }

    fn check_budget(
        &self,
        v: &mut Violations,
        roster: &ClubRoster,
        id: Option<Uuid>,
        salary: Money,
    ) {
        let ledger = roster.ledger();
        let current = id.and_then(|id| roster.salary_of(id));
        if !ledger.admits(salary, current, self.budget_policy) {
            v.budget(
                field::SALARY,
                format!(
                    "club '{}' does not have enough budget: available budget {}",
                    roster.club.code,
                    ledger.available_for(current)
                ),
            );
        }
    }

    fn check_budget_cover(&self, v: &mut Violations, roster: &ClubRoster, new_budget: Money) {
        let ledger = roster.ledger();
        if !ledger.covers(new_budget, self.budget_policy) {
            v.budget(
                field::BUDGET,
                format!(
                    "budget {new_budget} is insufficient for existing commitments of {}",
                    ledger.committed
                ),
            );
        }
    }
}
