use clap::Args;

use filesig::http_server::api::client::ApiError;
use filesig::http_server::api::v0::public_key::PublicKeyRequest;

#[derive(Args, Debug, Clone)]
pub struct PublicKey;

#[derive(Debug, thiserror::Error)]
pub enum PublicKeyError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for PublicKey {
    type Error = PublicKeyError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let response = ctx.client.call(PublicKeyRequest).await?;

        Ok(format!(
            "fingerprint: {}\nbits:        {}\n\n{}",
            response.fingerprint,
            response.bits,
            response.public_key.trim_end()
        ))
    }
}
