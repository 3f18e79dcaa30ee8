use sift_common::{Category, CategoryId, Scenario, ScenarioId};

use crate::{Position, RuntimeError, TokenPlacement};

const TOKEN_SPACING: f32 = 80.0;
const ZONE_SPACING: f32 = 100.0;

/// Centered rectangle the tokens may be dragged within.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayArea {
    pub width: f32,
    pub height: f32,
    pub padding: f32,
}

impl Default for PlayArea {
    fn default() -> Self {
        Self {
            width: 1600.0,
            height: 900.0,
            padding: 50.0,
        }
    }
}

impl PlayArea {
    pub fn clamp(&self, position: Position) -> Position {
        let half_width = (self.width / 2.0 - self.padding).max(0.0);
        let half_height = (self.height / 2.0 - self.padding).max(0.0);
        Position::new(
            position.x.clamp(-half_width, half_width),
            position.y.clamp(-half_height, half_height),
        )
    }

    fn token_origin(&self, slot: usize) -> Position {
        Position::new(
            -self.width * 0.35,
            self.height * 0.3 - slot as f32 * TOKEN_SPACING,
        )
    }

    fn zone_position(&self, slot: usize) -> Position {
        Position::new(
            self.width * 0.25,
            self.height * 0.2 - slot as f32 * ZONE_SPACING,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenState {
    Idle,
    Dragging,
    Paired(CategoryId),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DragToken {
    pub id: ScenarioId,
    pub state: TokenState,
    pub position: Position,
    pub original_position: Position,
}

impl DragToken {
    pub fn new<A: Into<String>>(id: A, original_position: Position) -> Self {
        Self {
            id: id.into(),
            state: TokenState::Idle,
            position: original_position,
            original_position,
        }
    }

    pub fn zone(&self) -> Option<&CategoryId> {
        match &self.state {
            TokenState::Paired(zone) => Some(zone),
            _ => None,
        }
    }

    fn return_to_origin(&mut self) {
        self.state = TokenState::Idle;
        self.position = self.original_position;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DropSlot {
    pub id: CategoryId,
    pub capacity: usize,
    /// Insertion ordered, never holds the same token twice.
    pub contained: Vec<ScenarioId>,
    pub position: Position,
}

impl DropSlot {
    pub fn new<A: Into<String>>(id: A, position: Position) -> Self {
        Self {
            id: id.into(),
            capacity: 1,
            contained: Vec::new(),
            position,
        }
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.max(1);
        self
    }

    pub fn contains(&self, token: &str) -> bool {
        self.contained.iter().any(|id| id == token)
    }

    pub fn is_empty(&self) -> bool {
        self.contained.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.contained.len() >= self.capacity
    }

    /// A full single-item zone still accepts by replacing its occupant.
    pub fn can_accept(&self, token: &str) -> bool {
        !self.contains(token) && (!self.is_full() || self.capacity == 1)
    }

    fn remove(&mut self, token: &str) -> bool {
        let before = self.contained.len();
        self.contained.retain(|id| id != token);
        self.contained.len() != before
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BoardEvent {
    Paired {
        token: ScenarioId,
        zone: CategoryId,
    },
    Unpaired {
        token: ScenarioId,
        zone: CategoryId,
    },
    Moved {
        token: ScenarioId,
        placement: TokenPlacement,
        position: Position,
    },
}

/// Drag tokens and drop zones of the drag-and-drop question on screen.
#[derive(Debug, Clone, Default)]
pub struct Board {
    area: PlayArea,
    tokens: Vec<DragToken>,
    zones: Vec<DropSlot>,
}

impl Board {
    pub fn new(area: PlayArea) -> Self {
        Self {
            area,
            tokens: Vec::new(),
            zones: Vec::new(),
        }
    }

    /// Replaces the board contents: one token per scenario, in the given
    /// order, and one single-item zone per category.
    pub fn setup(&mut self, scenarios: &[Scenario], categories: &[Category]) {
        self.tokens = scenarios
            .iter()
            .enumerate()
            .map(|(slot, scenario)| DragToken::new(scenario.id.clone(), self.area.token_origin(slot)))
            .collect();
        self.zones = categories
            .iter()
            .enumerate()
            .map(|(slot, category)| DropSlot::new(category.id.clone(), self.area.zone_position(slot)))
            .collect();
    }

    pub fn clear(&mut self) {
        self.tokens.clear();
        self.zones.clear();
    }

    pub fn area(&self) -> &PlayArea {
        &self.area
    }

    pub fn tokens(&self) -> &[DragToken] {
        &self.tokens
    }

    pub fn zones(&self) -> &[DropSlot] {
        &self.zones
    }

    pub fn token(&self, id: &str) -> Option<&DragToken> {
        self.tokens.iter().find(|token| token.id == id)
    }

    pub fn zone(&self, id: &str) -> Option<&DropSlot> {
        self.zones.iter().find(|zone| zone.id == id)
    }

    /// Every token back at its original position, every zone empty.
    pub fn reset(&mut self) {
        for token in &mut self.tokens {
            token.return_to_origin();
        }
        for zone in &mut self.zones {
            zone.contained.clear();
        }
    }

    pub fn begin_drag(&mut self, token_id: &str) -> Result<Vec<BoardEvent>, RuntimeError> {
        let token_index = self.token_index(token_id)?;
        let mut events = Vec::new();

        let previous = std::mem::replace(&mut self.tokens[token_index].state, TokenState::Dragging);
        match previous {
            TokenState::Dragging => {}
            TokenState::Idle => {}
            TokenState::Paired(zone_id) => {
                if let Some(zone) = self.zones.iter_mut().find(|zone| zone.id == zone_id) {
                    zone.remove(token_id);
                }
                events.push(BoardEvent::Unpaired {
                    token: token_id.to_string(),
                    zone: zone_id,
                });
            }
        }

        Ok(events)
    }

    /// Moves a dragged token, clamped to the play area. Tokens that are not
    /// being dragged stay put.
    pub fn move_drag(
        &mut self,
        token_id: &str,
        position: Position,
    ) -> Result<Option<Position>, RuntimeError> {
        let token_index = self.token_index(token_id)?;
        let token = &mut self.tokens[token_index];
        if token.state != TokenState::Dragging {
            return Ok(None);
        }

        token.position = self.area.clamp(position);
        Ok(Some(token.position))
    }

    pub fn end_drag(
        &mut self,
        token_id: &str,
        zone_id: Option<&str>,
    ) -> Result<Vec<BoardEvent>, RuntimeError> {
        let token_index = self.token_index(token_id)?;
        if self.tokens[token_index].state != TokenState::Dragging {
            return Ok(Vec::new());
        }

        // A drop onto a zone that is not on the board counts as a drop
        // outside every zone.
        match zone_id.and_then(|zone_id| self.zone_index(zone_id)) {
            Some(zone_index) => Ok(self.drop_into(token_index, zone_index)),
            None => Ok(vec![self.send_home(token_index)]),
        }
    }

    fn drop_into(&mut self, token_index: usize, zone_index: usize) -> Vec<BoardEvent> {
        let token_id = self.tokens[token_index].id.clone();
        let zone_id = self.zones[zone_index].id.clone();

        if self.zones[zone_index].contains(&token_id) {
            self.tokens[token_index].state = TokenState::Paired(zone_id);
            return Vec::new();
        }

        if !self.zones[zone_index].can_accept(&token_id) {
            log::debug!("zone `{}` is full, `{}` goes back", zone_id, token_id);
            return vec![self.send_home(token_index)];
        }

        let mut events = Vec::new();

        if self.zones[zone_index].is_full() {
            let evicted: Vec<ScenarioId> = self.zones[zone_index].contained.drain(..).collect();
            for occupant in evicted {
                if let Some(index) = self.tokens.iter().position(|token| token.id == occupant) {
                    events.push(BoardEvent::Unpaired {
                        token: occupant,
                        zone: zone_id.clone(),
                    });
                    events.push(self.send_home(index));
                }
            }
        }

        let zone = &mut self.zones[zone_index];
        zone.contained.push(token_id.clone());
        let position = zone.position;

        let token = &mut self.tokens[token_index];
        token.state = TokenState::Paired(zone_id.clone());
        token.position = position;

        events.push(BoardEvent::Paired {
            token: token_id.clone(),
            zone: zone_id.clone(),
        });
        events.push(BoardEvent::Moved {
            token: token_id,
            placement: TokenPlacement::Zone(zone_id),
            position,
        });
        events
    }

    fn send_home(&mut self, token_index: usize) -> BoardEvent {
        let token = &mut self.tokens[token_index];
        token.return_to_origin();
        BoardEvent::Moved {
            token: token.id.clone(),
            placement: TokenPlacement::Origin,
            position: token.position,
        }
    }

    fn token_index(&self, token_id: &str) -> Result<usize, RuntimeError> {
        self.tokens
            .iter()
            .position(|token| token.id == token_id)
            .ok_or_else(|| {
                log::warn!("no drag token `{}` on the board", token_id);
                RuntimeError::UnknownToken {
                    token: token_id.to_string(),
                }
            })
    }

    fn zone_index(&self, zone_id: &str) -> Option<usize> {
        let index = self.zones.iter().position(|zone| zone.id == zone_id);
        if index.is_none() {
            log::warn!("no drop zone `{}` on the board", zone_id);
        }
        index
    }
}
