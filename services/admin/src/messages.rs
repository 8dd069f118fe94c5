//! User-facing strings (pt-BR)

// Panel
pub const ADMIN_PANEL: &str = "Painel Administrativo";
pub const TAB_REGISTER_PRODUCT: &str = "Cadastrar Produto";
pub const TAB_REGISTERED_PRODUCTS: &str = "Produtos Cadastrados";
pub const TAB_SETTINGS: &str = "Configurações";
pub const HIGHLIGHT_BADGE: &str = "Destaque";

// Login
pub const LOGIN: &str = "Login";
pub const INVALID_CREDENTIALS: &str = "Email ou senha inválidos";
pub const CONNECTION_FAILED: &str = "Falha de conexão com o servidor";
pub const ERROR_SIGN_OUT: &str = "Erro ao sair";

// Products
pub const PRODUCT_CREATED: &str = "Produto criado com sucesso";
pub const PRODUCT_UPDATED: &str = "Produto atualizado com sucesso";
pub const PRODUCT_DELETED: &str = "Produto excluído com sucesso";
pub const ERROR_LOADING_PRODUCTS: &str = "Erro ao carregar produtos";
pub const ERROR_LOADING_PRODUCT: &str = "Erro ao carregar produto";
pub const ERROR_SAVING_PRODUCT: &str = "Erro ao salvar produto";
pub const ERROR_DELETING_PRODUCT: &str = "Erro ao excluir produto";
pub const ERROR_UPLOADING_IMAGE: &str = "Erro ao enviar imagem";
pub const ERROR_REMOVING_IMAGE: &str = "Erro ao remover imagem do produto";
pub const INVALID_PRICE: &str = "Preço inválido";

// Settings
pub const SETTINGS_UPDATED: &str = "Configurações atualizadas com sucesso";
pub const ERROR_LOADING_SETTINGS: &str = "Erro ao carregar configurações";
pub const ERROR_UPDATING_SETTINGS: &str = "Erro ao atualizar configurações";
pub const SETTINGS_ID_NOT_FOUND: &str = "ID das configurações não encontrado";

// Orders
pub const ORDER_STATUS_UPDATED: &str = "Status do pedido atualizado com sucesso";
pub const ERROR_LOADING_ORDERS: &str = "Erro ao carregar pedidos";
pub const ERROR_UPDATING_ORDER_STATUS: &str = "Erro ao atualizar status do pedido";
pub const ORDER_ALREADY_IN_STATUS: &str = "O pedido já está neste status";
pub const INVALID_ORDER_STATUS: &str = "Status de pedido inválido";
pub const USER_NOT_FOUND: &str = "Usuário não encontrado";

// Field labels
pub const FIELD_EMAIL: &str = "Email";
pub const FIELD_PASSWORD: &str = "Senha";
pub const FIELD_NAME: &str = "Nome";
pub const FIELD_DESCRIPTION: &str = "Descrição";
pub const FIELD_PRICE: &str = "Preço";
pub const FIELD_TITLE: &str = "Título";
pub const FIELD_SUBTITLE: &str = "Subtítulo";

// Errors
pub const ERROR_OCCURRED: &str = "Ocorreu um erro";
pub const NOTIFICATION_NOT_FOUND: &str = "Notificação não encontrada";

/// Message for a missing required field
pub fn required_field(label: &str) -> String {
    format!("Campo obrigatório: {}", label)
}
