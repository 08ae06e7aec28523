use std::path::PathBuf;

#[derive(Debug, Clone)]
pub enum PathOrStd {
    Path(PathBuf),
    StdStream,
}

impl std::str::FromStr for PathOrStd {
    type Err = std::convert::Infallible;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Ok(if value == "-" {
            Self::StdStream
        } else {
            Self::Path(value.into())
        })
    }
}
