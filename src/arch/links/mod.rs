mod link_fn;
mod logit;

pub use link_fn::LinkFn;
pub use logit::Logit;
