//! Conversions between wire types and engine types.

use engine::{
    Club, ClubNewCmd, ClubRoster, ClubUpdateCmd, Coach, CoachNewCmd, CoachUpdateCmd,
    LedgerReport, ListFilter, MutationOutcome, Page, Player, PlayerNewCmd, PlayerUpdateCmd,
};

use crate::types::{
    club::{ClubDetail, ClubNew, ClubUpdate, ClubView},
    coach::{CoachNew, CoachUpdate, CoachView},
    ledger::LedgerView,
    listing::{ListQuery, Listing, Pagination},
    mutation::MutationResponse,
    player::{PlayerNew, PlayerUpdate, PlayerView},
};

pub fn club_view(club: &Club) -> ClubView {
    ClubView {
        id_club: club.code.clone(),
        nombre: club.name.clone(),
        fundacion: club.founded,
        ciudad: club.city.clone(),
        estadio: club.stadium.clone(),
        presupuesto: club.budget.to_string(),
        presupuesto_restante: club.remaining.to_string(),
    }
}

pub fn club_detail(roster: &ClubRoster) -> ClubDetail {
    ClubDetail {
        club: club_view(&roster.club),
        jugadores: roster.players.iter().map(player_view).collect(),
        entrenador: roster.coach.as_ref().map(coach_view),
    }
}

pub fn player_view(player: &Player) -> PlayerView {
    PlayerView {
        id: player.id,
        nombre: player.first_name.clone(),
        apellidos: player.last_name.clone(),
        dorsal: player.shirt_number,
        salario: player.salary.to_string(),
        id_club: player.club.clone(),
    }
}

pub fn coach_view(coach: &Coach) -> CoachView {
    CoachView {
        id: coach.id,
        dni: coach.national_id.clone(),
        nombre: coach.first_name.clone(),
        apellidos: coach.last_name.clone(),
        salario: coach.salary.to_string(),
        id_club: coach.club.clone(),
    }
}

pub fn ledger_view(report: &LedgerReport) -> LedgerView {
    LedgerView {
        id_club: report.club_code.clone(),
        presupuesto: report.declared.to_string(),
        salarios_jugadores: report.players_committed.to_string(),
        salario_entrenador: report.coach_committed.to_string(),
        presupuesto_restante: report.remaining.to_string(),
        jugadores: report.player_count,
        tiene_entrenador: report.has_coach,
    }
}

pub fn listing<T, V>(page: Page<T>, view: impl Fn(&T) -> V) -> Listing<V> {
    Listing {
        pagination: Pagination {
            current_page: page.page,
            per_page: page.page_size,
            total_items: page.total_items,
            total_pages: page.total_pages,
            has_next_page: page.has_next(),
            has_prev_page: page.has_prev(),
        },
        items: page.items.iter().map(view).collect(),
    }
}

pub fn mutation<T>(outcome: MutationOutcome<T>) -> MutationResponse<T> {
    MutationResponse {
        success: outcome.success,
        errors: outcome.errors,
        entity: outcome.entity,
    }
}

pub fn list_filter(query: ListQuery) -> ListFilter {
    ListFilter {
        name: query.nombre,
        club: query.id_club,
        page: query.page.unwrap_or(1),
        page_size: query.limit.unwrap_or(ListFilter::DEFAULT_PAGE_SIZE),
    }
}

pub fn club_new_cmd(payload: ClubNew) -> ClubNewCmd {
    ClubNewCmd {
        code: payload.id_club,
        name: payload.nombre,
        founded: payload.fundacion,
        city: payload.ciudad,
        stadium: payload.estadio,
        budget: payload.presupuesto,
    }
}

pub fn club_update_cmd(payload: ClubUpdate) -> ClubUpdateCmd {
    ClubUpdateCmd {
        code: payload.id_club,
        name: payload.nombre,
        founded: payload.fundacion,
        city: payload.ciudad,
        stadium: payload.estadio,
        budget: payload.presupuesto,
    }
}

pub fn player_new_cmd(payload: PlayerNew) -> PlayerNewCmd {
    PlayerNewCmd {
        first_name: payload.nombre,
        last_name: payload.apellidos,
        shirt_number: payload.dorsal,
        salary: payload.salario,
        club: payload.id_club,
    }
}

pub fn player_update_cmd(payload: PlayerUpdate) -> PlayerUpdateCmd {
    PlayerUpdateCmd {
        first_name: payload.nombre,
        last_name: payload.apellidos,
        shirt_number: payload.dorsal,
        salary: payload.salario,
        club: payload.id_club,
    }
}

pub fn coach_new_cmd(payload: CoachNew) -> CoachNewCmd {
    CoachNewCmd {
        national_id: payload.dni,
        first_name: payload.nombre,
        last_name: payload.apellidos,
        salary: payload.salario,
        club: payload.id_club,
    }
}

pub fn coach_update_cmd(payload: CoachUpdate) -> CoachUpdateCmd {
    CoachUpdateCmd {
        national_id: payload.dni,
        first_name: payload.nombre,
        last_name: payload.apellidos,
        salary: payload.salario,
        club: payload.id_club,
    }
}
