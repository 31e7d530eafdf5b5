use std::str::FromStr;
use std::sync::Arc;

use rand::Rng;
use serde::Serialize;
use tracing::info;

use crate::models::game::{
    Color, ColorPreference, Game, GameMode, GameStatus, MAX_INCREMENT_SECONDS,
    MIN_BASE_TIME_SECONDS, ROOM_CODE_ALPHABET, ROOM_CODE_LENGTH,
};
use crate::repositories::errors::user_repository_errors::UserRepositoryError;
use crate::repositories::game_repository::GameRepository;
use crate::repositories::user_repository::UserRepository;
use crate::services::clock_service::ClockService;
use crate::services::errors::game_service_errors::GameServiceError;
use crate::services::notification_service::NotificationService;
use crate::sync::EntityLocks;
use crate::time::TimeSource;

/// Collisions are rare over a 32^6 code space, but generation is still
/// bounded rather than retrying forever against storage.
const MAX_ROOM_CODE_ATTEMPTS: usize = 16;

/// Display view of both clocks at a given instant.
#[derive(Debug, Clone, Serialize)]
pub struct ClockSnapshot {
    pub white_time_remaining: i64,
    pub black_time_remaining: i64,
    pub white_flagged: bool,
    pub black_flagged: bool,
}

pub struct GameService {
    games: Arc<dyn GameRepository + Send + Sync>,
    users: Arc<dyn UserRepository + Send + Sync>,
    clock: ClockService,
    time: Arc<dyn TimeSource + Send + Sync>,
    locks: Arc<EntityLocks>,
    notifications: NotificationService,
}

impl GameService {
    pub fn new(
        games: Arc<dyn GameRepository + Send + Sync>,
        users: Arc<dyn UserRepository + Send + Sync>,
        time: Arc<dyn TimeSource + Send + Sync>,
        locks: Arc<EntityLocks>,
        notifications: NotificationService,
    ) -> Self {
        GameService {
            games,
            users,
            clock: ClockService::new(),
            time,
            locks,
            notifications,
        }
    }

    pub async fn create_game(
        &self,
        host_id: &str,
        color_preference: ColorPreference,
        mode: GameMode,
        base_time_seconds: Option<i64>,
        increment_seconds: Option<i64>,
    ) -> Result<Game, GameServiceError> {
        self.users
            .get_user_by_id(host_id)
            .await
            .map_err(map_user_error)?;

        let (base, increment) = match mode {
            GameMode::Timed => {
                let base = base_time_seconds.ok_or_else(|| {
                    GameServiceError::ValidationError(
                        "Base time is required for timed games".to_string(),
                    )
                })?;
                let increment = increment_seconds.unwrap_or(0);
                if base < MIN_BASE_TIME_SECONDS {
                    return Err(GameServiceError::ValidationError(format!(
                        "Base time must be at least {} seconds",
                        MIN_BASE_TIME_SECONDS
                    )));
                }
                if !(0..=MAX_INCREMENT_SECONDS).contains(&increment) {
                    return Err(GameServiceError::ValidationError(format!(
                        "Increment must be between 0 and {} seconds",
                        MAX_INCREMENT_SECONDS
                    )));
                }
                (base, increment)
            }
            GameMode::Training => (0, 0),
        };

        let host_color = match color_preference {
            ColorPreference::White => Color::White,
            ColorPreference::Black => Color::Black,
            ColorPreference::Random => {
                if rand::random::<bool>() {
                    Color::White
                } else {
                    Color::Black
                }
            }
        };

        let room_code = self.generate_room_code().await?;
        let mut game = Game::new(host_id, host_color, mode, room_code);
        self.clock.initialize_clocks(&mut game, base, increment);

        self.games.create_game(&game).await?;
        info!("created game {} with room code {}", game.id, game.room_code);

        self.notifications.notify_game_updated(&game).await;
        Ok(game)
    }

    pub async fn join_game(&self, game_id: &str, guest_id: &str) -> Result<Game, GameServiceError> {
        let _guard = self.locks.acquire(game_id).await;
        let mut game = self
            .games
            .get_game(game_id)
            .await?
            .ok_or(GameServiceError::NotFound)?;

        self.attach_guest(&mut game, guest_id).await?;
        Ok(game)
    }

    /// Join via the shareable code. Unlike joining by id, the code is
    /// public to whoever the host shared it with, so self-join has to be
    /// rejected explicitly here.
    pub async fn join_by_room_code(
        &self,
        room_code: &str,
        guest_id: &str,
    ) -> Result<Game, GameServiceError> {
        let found = self
            .games
            .find_waiting_by_room_code(room_code)
            .await?
            .ok_or(GameServiceError::NotFound)?;

        if found.host_id == guest_id {
            return Err(GameServiceError::Unauthorized(
                "Cannot join your own game".to_string(),
            ));
        }

        // Re-read under the entity lock; the room may have filled up
        // between lookup and lock acquisition.
        let _guard = self.locks.acquire(&found.id).await;
        let mut game = self
            .games
            .get_game(&found.id)
            .await?
            .ok_or(GameServiceError::NotFound)?;

        self.attach_guest(&mut game, guest_id).await?;
        Ok(game)
    }

    async fn attach_guest(&self, game: &mut Game, guest_id: &str) -> Result<(), GameServiceError> {
        if game.status != GameStatus::WaitingForGuest {
            return Err(GameServiceError::InvalidState(
                "Game is not waiting for a guest".to_string(),
            ));
        }

        self.users
            .get_user_by_id(guest_id)
            .await
            .map_err(map_user_error)?;

        game.guest_id = Some(guest_id.to_string());
        game.status = GameStatus::Active;

        self.games.update_game(game).await?;
        info!("guest {} joined game {}", guest_id, game.id);

        self.notifications.notify_game_updated(game).await;
        Ok(())
    }

    /// Applies a move that has already passed legality validation. The
    /// clock is adjudicated first: if the mover's flag fell, the game
    /// completes with the opponent as winner and the submitted position
    /// is discarded.
    pub async fn submit_move(
        &self,
        game_id: &str,
        mover_id: &str,
        new_fen: &str,
        move_played: &str,
    ) -> Result<Game, GameServiceError> {
        let _guard = self.locks.acquire(game_id).await;
        let mut game = self
            .games
            .get_game(game_id)
            .await?
            .ok_or(GameServiceError::NotFound)?;

        if game.status != GameStatus::Active {
            return Err(GameServiceError::InvalidState(
                "Game is not active".to_string(),
            ));
        }

        let mover_color = game.color_of(mover_id).ok_or_else(|| {
            GameServiceError::Unauthorized("Not a participant in this game".to_string())
        })?;

        // The turn comes from the stored board, never from the client.
        let active_color = side_to_move(&game.current_fen)?;
        if mover_color != active_color {
            return Err(GameServiceError::InvalidState("Not your turn".to_string()));
        }

        // The submitted position must at least be a readable board.
        side_to_move(new_fen)?;

        let now = self.time.now();
        let outcome = self.clock.update_clock_after_move(&mut game, mover_color, now);

        if outcome.timed_out {
            game.status = GameStatus::Completed;
            game.winner = outcome.winner;
            info!(
                "game {} completed on time, winner {:?}",
                game.id, game.winner
            );
        } else {
            game.current_fen = new_fen.to_string();
            game.move_history.push(move_played.to_string());
        }

        self.games.update_game(&game).await?;
        self.notifications.notify_game_updated(&game).await;
        Ok(game)
    }

    pub async fn leave_game(
        &self,
        game_id: &str,
        user_id: &str,
    ) -> Result<Game, GameServiceError> {
        let _guard = self.locks.acquire(game_id).await;
        let mut game = self
            .games
            .get_game(game_id)
            .await?
            .ok_or(GameServiceError::NotFound)?;

        if !game.is_participant(user_id) {
            return Err(GameServiceError::Unauthorized(
                "Not a participant in this game".to_string(),
            ));
        }

        // Leaving a finished game is a no-op; terminal states stay put.
        if matches!(
            game.status,
            GameStatus::WaitingForGuest | GameStatus::Active
        ) {
            game.status = GameStatus::Abandoned;
            self.games.update_game(&game).await?;
            info!("game {} abandoned by {}", game.id, user_id);
            self.notifications.notify_game_updated(&game).await;
        }

        Ok(game)
    }

    pub async fn get_game(&self, game_id: &str) -> Result<Game, GameServiceError> {
        self.games
            .get_game(game_id)
            .await?
            .ok_or(GameServiceError::NotFound)
    }

    /// Live clock readout for display. The active side's remaining time
    /// is recomputed against "now"; nothing is persisted.
    pub fn clock_snapshot(&self, game: &Game) -> Result<ClockSnapshot, GameServiceError> {
        if game.mode == GameMode::Training {
            return Ok(ClockSnapshot {
                white_time_remaining: 0,
                black_time_remaining: 0,
                white_flagged: false,
                black_flagged: false,
            });
        }

        let active_color = side_to_move(&game.current_fen)?;
        let now = self.time.now();
        Ok(ClockSnapshot {
            white_time_remaining: self
                .clock
                .current_time_remaining(game, Color::White, active_color, now),
            black_time_remaining: self
                .clock
                .current_time_remaining(game, Color::Black, active_color, now),
            white_flagged: self
                .clock
                .is_time_expired(game, Color::White, active_color, now),
            black_flagged: self
                .clock
                .is_time_expired(game, Color::Black, active_color, now),
        })
    }

    async fn generate_room_code(&self) -> Result<String, GameServiceError> {
        // Each attempt is an independent existence check; no lock is
        // held across the loop.
        for _ in 0..MAX_ROOM_CODE_ATTEMPTS {
            let code = random_room_code();
            if self.games.find_waiting_by_room_code(&code).await?.is_none() {
                return Ok(code);
            }
        }
        Err(GameServiceError::RoomCodeExhausted)
    }
}

fn random_room_code() -> String {
    let mut rng = rand::thread_rng();
    (0..ROOM_CODE_LENGTH)
        .map(|_| ROOM_CODE_ALPHABET[rng.gen_range(0..ROOM_CODE_ALPHABET.len())] as char)
        .collect()
}

fn side_to_move(fen: &str) -> Result<Color, GameServiceError> {
    let board = chess::Board::from_str(fen)
        .map_err(|e| GameServiceError::ValidationError(format!("Invalid FEN: {}", e)))?;
    Ok(match board.side_to_move() {
        chess::Color::White => Color::White,
        chess::Color::Black => Color::Black,
    })
}

fn map_user_error(err: UserRepositoryError) -> GameServiceError {
    match err {
        UserRepositoryError::NotFound => GameServiceError::NotFound,
        other => GameServiceError::RepositoryError(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::game::STARTING_FEN;
    use crate::models::user::User;
    use crate::repositories::errors::game_repository_errors::GameRepositoryError;
    use crate::repositories::game_repository::MockGameRepository;
    use crate::repositories::user_repository::MockUserRepository;
    use crate::repositories::websocket_repository::MockWebSocketRepository;
    use crate::time::ManualTimeSource;
    use async_trait::async_trait;
    use chrono::{Duration, TimeZone, Utc};
    use std::collections::HashMap;
    use std::sync::Mutex;

    // FEN after 1. e4 (black to move).
    const FEN_AFTER_E4: &str = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1";
    // FEN after 1. e4 e5 (white to move).
    const FEN_AFTER_E4_E5: &str = "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 0 2";

    struct InMemoryGameRepository {
        games: Mutex<HashMap<String, Game>>,
    }

    impl InMemoryGameRepository {
        fn new() -> Self {
            InMemoryGameRepository {
                games: Mutex::new(HashMap::new()),
            }
        }
    }

    #[async_trait]
    impl GameRepository for InMemoryGameRepository {
        async fn create_game(&self, game: &Game) -> Result<(), GameRepositoryError> {
            self.games
                .lock()
                .unwrap()
                .insert(game.id.clone(), game.clone());
            Ok(())
        }

        async fn get_game(&self, game_id: &str) -> Result<Option<Game>, GameRepositoryError> {
            Ok(self.games.lock().unwrap().get(game_id).cloned())
        }

        async fn update_game(&self, game: &Game) -> Result<(), GameRepositoryError> {
            self.games
                .lock()
                .unwrap()
                .insert(game.id.clone(), game.clone());
            Ok(())
        }

        async fn find_waiting_by_room_code(
            &self,
            room_code: &str,
        ) -> Result<Option<Game>, GameRepositoryError> {
            Ok(self
                .games
                .lock()
                .unwrap()
                .values()
                .find(|g| g.room_code == room_code && g.status == GameStatus::WaitingForGuest)
                .cloned())
        }
    }

    fn known_users(ids: &[&str]) -> Arc<MockUserRepository> {
        let ids: Vec<String> = ids.iter().map(|s| s.to_string()).collect();
        let mut users = MockUserRepository::new();
        users.expect_get_user_by_id().returning(move |user_id| {
            if ids.iter().any(|id| id == user_id) {
                let mut user = User::new(user_id.to_string());
                user.id = user_id.to_string();
                Ok(user)
            } else {
                Err(UserRepositoryError::NotFound)
            }
        });
        Arc::new(users)
    }

    fn silent_notifications() -> NotificationService {
        let mut repository = MockWebSocketRepository::new();
        repository.expect_get_connection_id().returning(|_| Ok(None));
        NotificationService::new(Arc::new(repository))
    }

    fn t0() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn service_with(
        games: Arc<dyn GameRepository + Send + Sync>,
        users: Arc<MockUserRepository>,
    ) -> (GameService, Arc<ManualTimeSource>) {
        let time = Arc::new(ManualTimeSource::new(t0()));
        let service = GameService::new(
            games,
            users,
            time.clone(),
            Arc::new(EntityLocks::new()),
            silent_notifications(),
        );
        (service, time)
    }

    fn default_service() -> (GameService, Arc<ManualTimeSource>) {
        service_with(
            Arc::new(InMemoryGameRepository::new()),
            known_users(&["host", "guest"]),
        )
    }

    #[tokio::test]
    async fn test_create_timed_game() {
        let (service, _) = default_service();

        let game = service
            .create_game("host", ColorPreference::White, GameMode::Timed, Some(600), Some(5))
            .await
            .unwrap();

        assert_eq!(game.status, GameStatus::WaitingForGuest);
        assert_eq!(game.white_time_remaining, 600);
        assert_eq!(game.black_time_remaining, 600);
        assert!(game.last_move_at.is_none());
        assert_eq!(game.room_code.len(), ROOM_CODE_LENGTH);
        assert!(game
            .room_code
            .bytes()
            .all(|b| ROOM_CODE_ALPHABET.contains(&b)));
    }

    #[tokio::test]
    async fn test_create_game_unknown_host() {
        let (service, _) = default_service();

        let result = service
            .create_game("stranger", ColorPreference::White, GameMode::Timed, Some(600), Some(5))
            .await;

        assert!(matches!(result, Err(GameServiceError::NotFound)));
    }

    #[tokio::test]
    async fn test_create_game_rejects_bad_time_control() {
        let (service, _) = default_service();

        let too_short = service
            .create_game("host", ColorPreference::White, GameMode::Timed, Some(30), Some(0))
            .await;
        assert!(matches!(
            too_short,
            Err(GameServiceError::ValidationError(_))
        ));

        let bad_increment = service
            .create_game("host", ColorPreference::White, GameMode::Timed, Some(600), Some(90))
            .await;
        assert!(matches!(
            bad_increment,
            Err(GameServiceError::ValidationError(_))
        ));

        let missing_base = service
            .create_game("host", ColorPreference::White, GameMode::Timed, None, None)
            .await;
        assert!(matches!(
            missing_base,
            Err(GameServiceError::ValidationError(_))
        ));
    }

    #[tokio::test]
    async fn test_create_training_game_has_no_clock() {
        let (service, _) = default_service();

        let game = service
            .create_game("host", ColorPreference::Black, GameMode::Training, None, None)
            .await
            .unwrap();

        assert_eq!(game.mode, GameMode::Training);
        assert_eq!(game.white_time_remaining, 0);
        assert_eq!(game.black_time_remaining, 0);
        assert_eq!(game.host_color, Color::Black);
        assert_eq!(game.guest_color, Color::White);
    }

    #[tokio::test]
    async fn test_room_codes_unique_among_waiting_games() {
        let games = Arc::new(InMemoryGameRepository::new());
        let (service, _) = service_with(games.clone(), known_users(&["host"]));

        let mut seen = std::collections::HashSet::new();
        for _ in 0..20 {
            let game = service
                .create_game("host", ColorPreference::White, GameMode::Training, None, None)
                .await
                .unwrap();
            assert!(seen.insert(game.room_code.clone()), "room code reused");
        }
    }

    #[tokio::test]
    async fn test_room_code_exhaustion_is_bounded() {
        let collision = Game::new("other", Color::White, GameMode::Training, "XXXXXX".to_string());
        let mut games = MockGameRepository::new();
        games
            .expect_find_waiting_by_room_code()
            .returning(move |_| Ok(Some(collision.clone())));
        games.expect_create_game().never();

        let (service, _) = service_with(Arc::new(games), known_users(&["host"]));

        let result = service
            .create_game("host", ColorPreference::White, GameMode::Training, None, None)
            .await;

        assert!(matches!(result, Err(GameServiceError::RoomCodeExhausted)));
    }

    #[tokio::test]
    async fn test_join_game() {
        let (service, _) = default_service();
        let game = service
            .create_game("host", ColorPreference::White, GameMode::Timed, Some(600), Some(5))
            .await
            .unwrap();

        let joined = service.join_game(&game.id, "guest").await.unwrap();

        assert_eq!(joined.status, GameStatus::Active);
        assert_eq!(joined.guest_id.as_deref(), Some("guest"));
        // The clock still has not started.
        assert!(joined.last_move_at.is_none());
    }

    #[tokio::test]
    async fn test_join_game_twice_fails() {
        let (service, _) = default_service();
        let game = service
            .create_game("host", ColorPreference::White, GameMode::Timed, Some(600), Some(5))
            .await
            .unwrap();
        service.join_game(&game.id, "guest").await.unwrap();

        let result = service.join_game(&game.id, "guest").await;
        assert!(matches!(result, Err(GameServiceError::InvalidState(_))));
    }

    #[tokio::test]
    async fn test_join_by_room_code() {
        let (service, _) = default_service();
        let game = service
            .create_game("host", ColorPreference::White, GameMode::Timed, Some(600), Some(5))
            .await
            .unwrap();

        let joined = service
            .join_by_room_code(&game.room_code, "guest")
            .await
            .unwrap();

        assert_eq!(joined.id, game.id);
        assert_eq!(joined.status, GameStatus::Active);
    }

    #[tokio::test]
    async fn test_self_join_by_room_code_is_unauthorized() {
        let (service, _) = default_service();
        let game = service
            .create_game("host", ColorPreference::White, GameMode::Timed, Some(600), Some(5))
            .await
            .unwrap();

        let result = service.join_by_room_code(&game.room_code, "host").await;
        assert!(matches!(result, Err(GameServiceError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_join_by_unknown_room_code() {
        let (service, _) = default_service();

        let result = service.join_by_room_code("ZZZZZZ", "guest").await;
        assert!(matches!(result, Err(GameServiceError::NotFound)));
    }

    async fn active_game(service: &GameService) -> Game {
        let game = service
            .create_game("host", ColorPreference::White, GameMode::Timed, Some(600), Some(5))
            .await
            .unwrap();
        service.join_game(&game.id, "guest").await.unwrap()
    }

    #[tokio::test]
    async fn test_first_move_starts_clock_without_deduction() {
        let (service, time) = default_service();
        let game = active_game(&service).await;

        time.advance(Duration::seconds(120));
        let updated = service
            .submit_move(&game.id, "host", FEN_AFTER_E4, "e2e4")
            .await
            .unwrap();

        // Two minutes passed waiting for the guest; none of it counts.
        assert_eq!(updated.white_time_remaining, 600);
        assert_eq!(updated.last_move_at, Some(time.now()));
        assert_eq!(updated.current_fen, FEN_AFTER_E4);
        assert_eq!(updated.move_history, vec!["e2e4".to_string()]);
    }

    #[tokio::test]
    async fn test_move_deducts_and_increments() {
        let (service, time) = default_service();
        let game = active_game(&service).await;
        service
            .submit_move(&game.id, "host", FEN_AFTER_E4, "e2e4")
            .await
            .unwrap();

        time.advance(Duration::milliseconds(12_400));
        let updated = service
            .submit_move(&game.id, "guest", FEN_AFTER_E4_E5, "e7e5")
            .await
            .unwrap();

        assert_eq!(updated.black_time_remaining, 600 - 13 + 5);
        assert_eq!(updated.white_time_remaining, 600);
        assert_eq!(updated.status, GameStatus::Active);
    }

    #[tokio::test]
    async fn test_timeout_completes_game_and_discards_move() {
        let (service, time) = default_service();
        let game = active_game(&service).await;
        service
            .submit_move(&game.id, "host", FEN_AFTER_E4, "e2e4")
            .await
            .unwrap();
        time.advance(Duration::milliseconds(12_400));
        service
            .submit_move(&game.id, "guest", FEN_AFTER_E4_E5, "e7e5")
            .await
            .unwrap();

        // White sits for 605 seconds with 600 on the clock.
        time.advance(Duration::seconds(605));
        let updated = service
            .submit_move(&game.id, "host", FEN_AFTER_E4, "d2d4")
            .await
            .unwrap();

        assert_eq!(updated.status, GameStatus::Completed);
        assert_eq!(updated.winner, Some(Color::Black));
        assert_eq!(updated.white_time_remaining, 0);
        assert_eq!(updated.black_time_remaining, 592);
        // The submitted position was never applied.
        assert_eq!(updated.current_fen, FEN_AFTER_E4_E5);
        assert_eq!(updated.move_history.len(), 2);
    }

    #[tokio::test]
    async fn test_move_out_of_turn_rejected() {
        let (service, _) = default_service();
        let game = active_game(&service).await;

        // Black tries to move first.
        let result = service
            .submit_move(&game.id, "guest", FEN_AFTER_E4, "e7e5")
            .await;
        assert!(matches!(result, Err(GameServiceError::InvalidState(_))));
    }

    #[tokio::test]
    async fn test_move_by_stranger_rejected() {
        let (service, _) = default_service();
        let game = active_game(&service).await;

        let result = service
            .submit_move(&game.id, "stranger", FEN_AFTER_E4, "e2e4")
            .await;
        assert!(matches!(result, Err(GameServiceError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_move_with_garbage_fen_rejected() {
        let (service, _) = default_service();
        let game = active_game(&service).await;

        let result = service
            .submit_move(&game.id, "host", "not a position", "e2e4")
            .await;
        assert!(matches!(result, Err(GameServiceError::ValidationError(_))));

        // Nothing was committed.
        let unchanged = service.get_game(&game.id).await.unwrap();
        assert_eq!(unchanged.current_fen, STARTING_FEN);
    }

    #[tokio::test]
    async fn test_move_on_waiting_game_rejected() {
        let (service, _) = default_service();
        let game = service
            .create_game("host", ColorPreference::White, GameMode::Timed, Some(600), Some(5))
            .await
            .unwrap();

        let result = service
            .submit_move(&game.id, "host", FEN_AFTER_E4, "e2e4")
            .await;
        assert!(matches!(result, Err(GameServiceError::InvalidState(_))));
    }

    #[tokio::test]
    async fn test_leave_active_game_abandons_it() {
        let (service, _) = default_service();
        let game = active_game(&service).await;

        let left = service.leave_game(&game.id, "guest").await.unwrap();
        assert_eq!(left.status, GameStatus::Abandoned);
    }

    #[tokio::test]
    async fn test_leave_completed_game_is_noop() {
        let (service, time) = default_service();
        let game = active_game(&service).await;
        service
            .submit_move(&game.id, "host", FEN_AFTER_E4, "e2e4")
            .await
            .unwrap();
        time.advance(Duration::seconds(1));
        service
            .submit_move(&game.id, "guest", FEN_AFTER_E4_E5, "e7e5")
            .await
            .unwrap();
        time.advance(Duration::seconds(700));
        service
            .submit_move(&game.id, "host", FEN_AFTER_E4, "d2d4")
            .await
            .unwrap();

        let left = service.leave_game(&game.id, "host").await.unwrap();
        assert_eq!(left.status, GameStatus::Completed);
    }

    #[tokio::test]
    async fn test_leave_by_stranger_rejected() {
        let (service, _) = default_service();
        let game = active_game(&service).await;

        let result = service.leave_game(&game.id, "stranger").await;
        assert!(matches!(result, Err(GameServiceError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_clock_snapshot_live_for_active_side() {
        let (service, time) = default_service();
        let game = active_game(&service).await;
        let game = service
            .submit_move(&game.id, "host", FEN_AFTER_E4, "e2e4")
            .await
            .unwrap();

        time.advance(Duration::seconds(30));
        let snapshot = service.clock_snapshot(&game).unwrap();

        // Black is on the move and has burned 30 seconds.
        assert_eq!(snapshot.black_time_remaining, 570);
        assert_eq!(snapshot.white_time_remaining, 600);
        assert!(!snapshot.white_flagged);
        assert!(!snapshot.black_flagged);

        time.advance(Duration::seconds(600));
        let snapshot = service.clock_snapshot(&game).unwrap();
        assert!(snapshot.black_flagged);
        assert!(snapshot.black_time_remaining < 0);
    }
}
