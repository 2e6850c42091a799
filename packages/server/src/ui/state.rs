//! Server state and dependency wiring.

use std::sync::Arc;

use crate::{
    config::ServerConfig,
    domain::MessagePusher,
    infrastructure::{
        message_pusher::WebSocketMessagePusher,
        password::BcryptPasswordHasher,
        repository::{InMemoryMessageRepository, InMemoryUserRepository},
    },
    usecase::{
        AuthUseCase, BroadcastEngine, ClearMessagesUseCase, ConnectParticipantUseCase,
        DisconnectParticipantUseCase, PresenceUseCase, RoomUseCase, new_shared_membership,
        new_shared_presence,
    },
};

/// Shared application state
pub struct AppState {
    /// AuthUseCase（サインアップ・ログイン）
    pub auth_usecase: Arc<AuthUseCase>,
    /// PresenceUseCase（プレゼンス登録・削除）
    pub presence_usecase: Arc<PresenceUseCase>,
    /// RoomUseCase（ルーム参加）
    pub room_usecase: Arc<RoomUseCase>,
    /// BroadcastEngine（ルーム・全体への配信）
    pub broadcast: Arc<BroadcastEngine>,
    /// ClearMessagesUseCase（全メッセージ削除）
    pub clear_messages_usecase: Arc<ClearMessagesUseCase>,
    /// ConnectParticipantUseCase（接続）
    pub connect_participant_usecase: Arc<ConnectParticipantUseCase>,
    /// DisconnectParticipantUseCase（切断）
    pub disconnect_participant_usecase: Arc<DisconnectParticipantUseCase>,
    /// MessagePusher（送信元への応答に使用）
    pub message_pusher: Arc<dyn MessagePusher>,
    /// Largest inbound WebSocket message accepted
    pub max_message_bytes: usize,
}

impl AppState {
    /// Wire every use case over the in-memory repositories
    pub fn in_memory(config: &ServerConfig) -> Self {
        // Initialize dependencies in order:
        // 1. Repository / PasswordHasher
        // 2. MessagePusher
        // 3. Shared registries
        // 4. UseCases

        // 1. Create Repositories (in-memory database)
        let user_repository = Arc::new(InMemoryUserRepository::new());
        let message_repository = Arc::new(InMemoryMessageRepository::new());
        let password_hasher = Arc::new(BcryptPasswordHasher::new(config.bcrypt_cost));

        // 2. Create MessagePusher (WebSocket implementation)
        let message_pusher = Arc::new(WebSocketMessagePusher::new());

        // 3. Create Presence / Membership registries
        let presence = new_shared_presence();
        let membership = new_shared_membership();

        // 4. Create UseCases
        let broadcast = Arc::new(BroadcastEngine::new(
            presence.clone(),
            membership.clone(),
            message_repository.clone(),
            message_pusher.clone(),
        ));
        let auth_usecase = Arc::new(AuthUseCase::new(user_repository, password_hasher));
        let presence_usecase = Arc::new(PresenceUseCase::new(presence, broadcast.clone()));
        let room_usecase = Arc::new(RoomUseCase::new(
            membership,
            message_repository.clone(),
            message_pusher.clone(),
        ));
        let clear_messages_usecase = Arc::new(ClearMessagesUseCase::new(
            message_repository,
            broadcast.clone(),
            config.admin_token.clone(),
        ));
        let connect_participant_usecase =
            Arc::new(ConnectParticipantUseCase::new(message_pusher.clone()));
        let disconnect_participant_usecase = Arc::new(DisconnectParticipantUseCase::new(
            presence_usecase.clone(),
            room_usecase.clone(),
            message_pusher.clone(),
        ));

        Self {
            auth_usecase,
            presence_usecase,
            room_usecase,
            broadcast,
            clear_messages_usecase,
            connect_participant_usecase,
            disconnect_participant_usecase,
            message_pusher,
            max_message_bytes: config.body_limit_bytes,
        }
    }
}
