use crate::model::card::Card;
use crate::model::deck::Deck;
use crate::model::hand::Hand;
use crate::model::score::{self, ScoreBoard};
use crate::model::seat::Seat;
use crate::model::trick::{Play, TRICK_SIZE, Trick, TrickError};
use std::{array, fmt, mem};

pub const HAND_SIZE: usize = 13;
pub const TRICKS_PER_GAME: usize = 13;
pub const DEFAULT_NAMES: [&str; 4] = ["Trixie", "Coco", "You", "Katya"];

/// One deal of Hearts, from the opening lead to the last trick.
///
/// Transitions never mutate `self`: [`Game::play`] returns the next state and
/// leaves the previous one intact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    turn: Seat,
    hands: [Hand; 4],
    tricks: Vec<Trick>,
    current_trick: Trick,
    names: [String; 4],
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayError {
    GameOver,
    IllegalCard(Card),
}

impl fmt::Display for PlayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayError::GameOver => write!(f, "the game is already over"),
            PlayError::IllegalCard(card) => write!(f, "{card} is not a legal play"),
        }
    }
}

impl std::error::Error for PlayError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PositionError {
    IncompleteTrick(usize),
    Trick(TrickError),
    TurnMismatch { expected: Seat, actual: Seat },
}

impl fmt::Display for PositionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PositionError::IncompleteTrick(index) => {
                write!(f, "completed trick {index} does not have four plays")
            }
            PositionError::Trick(err) => write!(f, "invalid trick: {err}"),
            PositionError::TurnMismatch { expected, actual } => {
                write!(f, "current trick expects {expected} but turn is {actual}")
            }
        }
    }
}

impl std::error::Error for PositionError {}

impl From<TrickError> for PositionError {
    fn from(value: TrickError) -> Self {
        PositionError::Trick(value)
    }
}

impl Game {
    /// Deals contiguous quarters of `deck`: the first thirteen cards to North,
    /// the next to East, then South and West. The holder of the two of clubs
    /// leads.
    pub fn new(deck: &Deck) -> Self {
        let mut chunks = deck.cards().chunks(HAND_SIZE);
        let hands: [Hand; 4] =
            array::from_fn(|_| Hand::with_cards(chunks.next().unwrap_or_default().to_vec()));

        let turn = Seat::LOOP
            .iter()
            .copied()
            .find(|seat| hands[seat.index()].contains(Card::TWO_OF_CLUBS))
            .unwrap_or(Seat::North);

        Self {
            turn,
            hands,
            tricks: Vec::with_capacity(TRICKS_PER_GAME),
            current_trick: Trick::new(turn),
            names: DEFAULT_NAMES.map(String::from),
        }
    }

    pub fn dealt<R: rand::Rng + ?Sized>(rng: &mut R) -> Self {
        Self::new(&Deck::shuffled(rng))
    }

    /// Builds an arbitrary position, e.g. a hand-written endgame. Completed
    /// tricks must hold four plays in clockwise order and the current trick
    /// must be waiting on `turn`.
    pub fn from_parts(
        turn: Seat,
        hands: [Vec<Card>; 4],
        tricks: Vec<Vec<Play>>,
        current_trick: Vec<Play>,
    ) -> Result<Self, PositionError> {
        let mut history = Vec::with_capacity(tricks.len());
        for (index, plays) in tricks.iter().enumerate() {
            if plays.len() != TRICK_SIZE {
                return Err(PositionError::IncompleteTrick(index));
            }
            history.push(Trick::from_plays(plays)?);
        }

        let current_trick = if current_trick.is_empty() {
            Trick::new(turn)
        } else {
            Trick::from_plays(&current_trick)?
        };
        let expected = current_trick.expected_seat();
        if current_trick.is_complete() || expected != turn {
            return Err(PositionError::TurnMismatch {
                expected,
                actual: turn,
            });
        }

        Ok(Self {
            turn,
            hands: hands.map(Hand::with_cards),
            tricks: history,
            current_trick,
            names: DEFAULT_NAMES.map(String::from),
        })
    }

    pub fn with_names(mut self, names: [String; 4]) -> Self {
        self.names = names;
        self
    }

    pub fn turn(&self) -> Seat {
        self.turn
    }

    pub fn hands(&self) -> &[Hand; 4] {
        &self.hands
    }

    pub fn hand(&self, seat: Seat) -> &Hand {
        &self.hands[seat.index()]
    }

    pub fn current_hand(&self) -> &Hand {
        self.hand(self.turn)
    }

    pub fn tricks(&self) -> &[Trick] {
        &self.tricks
    }

    pub fn current_trick(&self) -> &Trick {
        &self.current_trick
    }

    pub fn previous_trick(&self) -> Option<&Trick> {
        self.tricks.last()
    }

    pub fn names(&self) -> &[String; 4] {
        &self.names
    }

    pub fn name(&self, seat: Seat) -> &str {
        &self.names[seat.index()]
    }

    pub fn is_start_of_game(&self) -> bool {
        self.tricks.is_empty() && self.current_trick.is_empty()
    }

    pub fn is_start_of_trick(&self) -> bool {
        self.current_trick.is_empty()
    }

    pub fn hearts_broken(&self) -> bool {
        self.current_trick.contains_heart() || self.tricks.iter().any(Trick::contains_heart)
    }

    /// Cards still accounted for across hands, the current trick and history.
    pub fn card_count(&self) -> usize {
        self.hands.iter().map(Hand::len).sum::<usize>()
            + self.current_trick.len()
            + self.tricks.len() * TRICK_SIZE
    }

    /// Legal moves for the seat whose turn it is.
    pub fn playable_cards(&self) -> Vec<Card> {
        let hand = self.current_hand();

        if self.is_start_of_game() && hand.contains(Card::TWO_OF_CLUBS) {
            return vec![Card::TWO_OF_CLUBS];
        }

        match self.current_trick.lead_suit() {
            None if !self.hearts_broken() => {
                let safe: Vec<Card> = hand
                    .iter()
                    .copied()
                    .filter(|card| !card.suit.is_heart())
                    .collect();
                // A hand of nothing but hearts may lead one anyway.
                if safe.is_empty() {
                    hand.cards().to_vec()
                } else {
                    safe
                }
            }
            None => hand.cards().to_vec(),
            Some(suit) if hand.has_suit(suit) => hand.of_suit(suit),
            Some(_) => hand.cards().to_vec(),
        }
    }

    pub fn can_play(&self, card: Card) -> bool {
        self.playable_cards().contains(&card)
    }

    /// Plays `card` for the seat to act without checking legality; callers
    /// validate through [`Game::can_play`] first. See [`Game::try_play`] for
    /// the checked variant.
    pub fn play(&self, card: Card) -> Game {
        let mut next = self.clone();
        next.apply(card);
        next
    }

    pub fn try_play(&self, card: Card) -> Result<Game, PlayError> {
        if self.is_over() {
            return Err(PlayError::GameOver);
        }
        if !self.can_play(card) {
            return Err(PlayError::IllegalCard(card));
        }
        Ok(self.play(card))
    }

    fn apply(&mut self, card: Card) {
        let seat = self.turn;
        self.current_trick.record(seat, card);
        self.hands[seat.index()].remove(card);

        match self.current_trick.winner() {
            Some(winner) => {
                let finished = mem::replace(&mut self.current_trick, Trick::new(winner));
                self.tricks.push(finished);
                self.turn = winner;
            }
            None => self.turn = seat.next(),
        }
    }

    pub fn is_over(&self) -> bool {
        self.hands.iter().all(Hand::is_empty)
    }

    /// Penalty points taken per seat before the moon rule is applied.
    pub fn points_taken(&self) -> [u32; 4] {
        let mut totals = [0u32; 4];
        for trick in &self.tricks {
            if let Some(winner) = trick.winner() {
                totals[winner.index()] += u32::from(trick.penalty_total());
            }
        }
        totals
    }

    pub fn tricks_won(&self) -> [u8; 4] {
        let mut counts = [0u8; 4];
        for winner in self.tricks.iter().filter_map(Trick::winner) {
            counts[winner.index()] = counts[winner.index()].saturating_add(1);
        }
        counts
    }

    pub fn score(&self) -> ScoreBoard {
        ScoreBoard::settle(self.points_taken())
    }

    pub fn winners(&self) -> Vec<Seat> {
        self.score().winners()
    }

    pub fn moon_shooter(&self) -> Option<Seat> {
        score::moon_shooter(&self.points_taken())
    }

    /// Headline for the final score display; `None` until the game is over.
    pub fn outcome_text(&self) -> Option<String> {
        if !self.is_over() {
            return None;
        }
        let text = match self.winners().as_slice() {
            [seat] if seat.is_human() => "You Win!".to_string(),
            [seat] => format!("{} Wins!", self.name(*seat)),
            _ => "It's a Tie!".to_string(),
        };
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::{Game, PlayError, PositionError};
    use crate::model::card::{Card, parse_cards};
    use crate::model::deck::Deck;
    use crate::model::rank::Rank;
    use crate::model::seat::Seat;
    use crate::model::suit::Suit;
    use crate::model::trick::Play;

    fn cards(text: &str) -> Vec<Card> {
        parse_cards(text).unwrap()
    }

    fn card(token: &str) -> Card {
        token.parse().unwrap()
    }

    /// Every seat holds a single suit apart from North's ace of clubs and
    /// West's ace of hearts.
    fn lopsided() -> Game {
        Game::from_parts(
            Seat::West,
            [
                cards("H 2 3 4 5 6 7 8 9 10 J K Q C A"),
                cards("S 2 3 4 5 6 7 8 9 10 J K Q A"),
                cards("D 2 3 4 5 6 7 8 9 10 J K Q A"),
                cards("C 2 3 4 5 6 7 8 9 10 J K Q H A"),
            ],
            Vec::new(),
            Vec::new(),
        )
        .unwrap()
    }

    #[test]
    fn standard_deck_deals_contiguous_quarters() {
        let game = Game::new(&Deck::standard());
        for seat in Seat::LOOP {
            assert_eq!(game.hand(seat).len(), 13, "{seat} should have 13 cards");
        }
        assert!(game.hand(Seat::North).iter().all(|c| c.suit == Suit::Hearts));
        assert!(game.hand(Seat::East).iter().all(|c| c.suit == Suit::Spades));
        assert!(game.hand(Seat::South).iter().all(|c| c.suit == Suit::Diamonds));
        assert!(game.hand(Seat::West).iter().all(|c| c.suit == Suit::Clubs));
        assert_eq!(game.turn(), Seat::West);
        assert!(game.is_start_of_game());
    }

    #[test]
    fn holder_of_two_of_clubs_leads() {
        let game = Game::new(&Deck::shuffled_with_seed(99));
        assert!(game.current_hand().contains(Card::TWO_OF_CLUBS));
        assert_eq!(game.current_trick().leader(), game.turn());
        assert_eq!(game.card_count(), 52);
    }

    #[test]
    fn opening_lead_is_two_of_clubs_only() {
        let game = Game::new(&Deck::shuffled_with_seed(5));
        assert_eq!(game.playable_cards(), vec![Card::TWO_OF_CLUBS]);
        assert!(game.can_play(Card::TWO_OF_CLUBS));
        assert!(!game.can_play(card("3C")));
    }

    #[test]
    fn followers_must_match_lead_suit() {
        let game = lopsided().play(Card::TWO_OF_CLUBS);
        assert_eq!(game.turn(), Seat::North);
        assert_eq!(game.playable_cards(), vec![card("AC")]);
    }

    #[test]
    fn void_followers_may_discard_anything() {
        let game = lopsided().play(Card::TWO_OF_CLUBS).play(card("AC"));
        assert_eq!(game.turn(), Seat::East);
        assert_eq!(game.playable_cards().len(), 13);
        assert!(game.can_play(card("QS")));
    }

    #[test]
    fn all_hearts_hand_may_lead_unbroken_hearts() {
        let start = lopsided();
        let next = start
            .play(Card::TWO_OF_CLUBS)
            .play(card("AC"))
            .play(card("2S"))
            .play(card("2D"));

        assert_eq!(next.tricks().len(), 1);
        assert_eq!(next.turn(), Seat::North);
        assert!(!next.hearts_broken());
        assert!(next.can_play(card("2H")));
        assert_eq!(next.playable_cards().len(), 12);
    }

    #[test]
    fn unbroken_hearts_cannot_be_led_with_other_suits_held() {
        let game = Game::from_parts(
            Seat::East,
            [
                cards("S 3"),
                cards("H 5 9 D 7 C K"),
                cards("S 4"),
                cards("S 6"),
            ],
            vec![vec![
                Play::new(Card::TWO_OF_CLUBS, Seat::West),
                Play::new(card("3C"), Seat::North),
                Play::new(card("AC"), Seat::East),
                Play::new(card("2D"), Seat::South),
            ]],
            Vec::new(),
        )
        .unwrap();
        assert_eq!(game.playable_cards(), vec![card("7D"), card("KC")]);
    }

    #[test]
    fn broken_hearts_open_every_lead() {
        let game = Game::from_parts(
            Seat::East,
            [
                cards("S 3"),
                cards("H 5 9 D 7 C K"),
                cards("S 4"),
                cards("S 6"),
            ],
            vec![vec![
                Play::new(Card::TWO_OF_CLUBS, Seat::West),
                Play::new(card("3C"), Seat::North),
                Play::new(card("AC"), Seat::East),
                Play::new(card("2H"), Seat::South),
            ]],
            Vec::new(),
        )
        .unwrap();
        assert!(game.hearts_broken());
        assert_eq!(game.playable_cards().len(), 4);
    }

    #[test]
    fn play_leaves_previous_state_untouched() {
        let start = Game::new(&Deck::shuffled_with_seed(11));
        let snapshot = start.clone();
        let next = start.play(Card::TWO_OF_CLUBS);

        assert_eq!(start, snapshot);
        assert_eq!(next.current_trick().len(), 1);
        assert_eq!(next.turn(), start.turn().next());
        assert!(!next.hand(start.turn()).contains(Card::TWO_OF_CLUBS));
        assert_eq!(next.card_count(), 52);
    }

    #[test]
    fn completed_trick_moves_to_history_and_winner_leads() {
        let game = lopsided()
            .play(Card::TWO_OF_CLUBS)
            .play(card("AC"))
            .play(card("2S"))
            .play(card("2D"));
        let trick = game.previous_trick().unwrap();
        assert_eq!(trick.winner(), Some(Seat::North));
        assert!(game.current_trick().is_empty());
        assert_eq!(game.current_trick().leader(), Seat::North);
        assert_eq!(game.tricks_won(), [1, 0, 0, 0]);
    }

    #[test]
    fn play_trusts_its_caller() {
        let game = Game::new(&Deck::standard());
        let illegal = card("KC");
        let next = game.play(illegal);
        assert_eq!(next.current_trick().plays()[0].card, illegal);
        assert_eq!(
            game.try_play(illegal),
            Err(PlayError::IllegalCard(illegal))
        );
        assert_eq!(
            game.try_play(Card::TWO_OF_CLUBS),
            Ok(game.play(Card::TWO_OF_CLUBS))
        );
    }

    #[test]
    fn try_play_refuses_finished_games() {
        let game = Game::from_parts(
            Seat::North,
            [Vec::new(), Vec::new(), Vec::new(), Vec::new()],
            Vec::new(),
            Vec::new(),
        )
        .unwrap();
        assert!(game.is_over());
        assert!(game.playable_cards().is_empty());
        assert_eq!(game.try_play(Card::TWO_OF_CLUBS), Err(PlayError::GameOver));
    }

    fn moon_game() -> Game {
        let trick = |lead: &str, east: &str, south: &str, west: &str| {
            vec![
                Play::new(card(lead), Seat::North),
                Play::new(card(east), Seat::East),
                Play::new(card(south), Seat::South),
                Play::new(card(west), Seat::West),
            ]
        };
        Game::from_parts(
            Seat::North,
            [Vec::new(), Vec::new(), Vec::new(), Vec::new()],
            vec![
                trick("AH", "2H", "3H", "4H"),
                trick("KH", "5H", "6H", "7H"),
                trick("QH", "8H", "9H", "10H"),
                trick("JH", "QS", "2C", "3C"),
            ],
            Vec::new(),
        )
        .unwrap()
    }

    #[test]
    fn shooting_the_moon_inverts_scores() {
        let game = moon_game();
        assert_eq!(game.points_taken(), [26, 0, 0, 0]);
        assert_eq!(game.moon_shooter(), Some(Seat::North));
        assert_eq!(game.score().standings(), &[0, 26, 26, 26]);
        assert_eq!(game.winners(), vec![Seat::North]);
        assert_eq!(game.outcome_text().as_deref(), Some("Trixie Wins!"));
    }

    #[test]
    fn points_go_to_trick_winner() {
        let game = Game::from_parts(
            Seat::East,
            [Vec::new(), Vec::new(), Vec::new(), Vec::new()],
            vec![vec![
                Play::new(card("10S"), Seat::North),
                Play::new(card("KS"), Seat::East),
                Play::new(card("QS"), Seat::South),
                Play::new(card("4H"), Seat::West),
            ]],
            Vec::new(),
        )
        .unwrap();
        assert_eq!(game.score().standings(), &[0, 14, 0, 0]);
        assert_eq!(game.winners(), vec![Seat::North, Seat::South, Seat::West]);
        assert_eq!(game.outcome_text().as_deref(), Some("It's a Tie!"));
    }

    #[test]
    fn outcome_text_waits_for_the_end() {
        let game = Game::new(&Deck::standard());
        assert_eq!(game.outcome_text(), None);
        let renamed = game.with_names(["A", "B", "C", "D"].map(String::from));
        assert_eq!(renamed.name(Seat::East), "B");
    }

    #[test]
    fn from_parts_rejects_short_history() {
        let err = Game::from_parts(
            Seat::North,
            [Vec::new(), Vec::new(), Vec::new(), Vec::new()],
            vec![vec![Play::new(Card::new(Rank::Two, Suit::Clubs), Seat::North)]],
            Vec::new(),
        )
        .unwrap_err();
        assert_eq!(err, PositionError::IncompleteTrick(0));
    }
}
