use crate::artifacts::core::error::VcsError;
use std::io::BufRead;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectType {
    Blob,
    Tree,
    Commit,
}

impl ObjectType {
    pub fn as_str(&self) -> &str {
        match self {
            ObjectType::Blob => "blob",
            ObjectType::Tree => "tree",
            ObjectType::Commit => "commit",
        }
    }

    /// Parse the `<type> <size>\0` framing header
    ///
    /// Consumes the header from the reader and returns the object type along
    /// with the declared payload size, which callers check against the actual
    /// payload length.
    pub fn parse_header(data_reader: &mut impl BufRead) -> anyhow::Result<(ObjectType, usize)> {
        let mut object_type = Vec::new();
        data_reader.read_until(b' ', &mut object_type)?;
        if object_type.pop() != Some(b' ') {
            anyhow::bail!(VcsError::Corrupt("missing object type".into()));
        }

        let object_type = String::from_utf8(object_type)
            .map_err(|_| VcsError::Corrupt("object type is not valid utf-8".into()))?;
        let object_type = ObjectType::try_from(object_type.as_str())?;

        let mut size = Vec::new();
        data_reader.read_until(b'\0', &mut size)?;
        if size.pop() != Some(b'\0') {
            anyhow::bail!(VcsError::Corrupt("missing payload size".into()));
        }

        let size = String::from_utf8(size)
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .ok_or_else(|| VcsError::Corrupt("invalid payload size".into()))?;

        Ok((object_type, size))
    }
}

impl TryFrom<&str> for ObjectType {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> anyhow::Result<Self> {
        match value {
            "blob" => Ok(ObjectType::Blob),
            "tree" => Ok(ObjectType::Tree),
            "commit" => Ok(ObjectType::Commit),
            other => Err(VcsError::BadObjectType(other.to_string()).into()),
        }
    }
}

impl std::fmt::Display for ObjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn parses_header_and_leaves_payload() {
        let mut reader = Cursor::new(b"blob 6\0hello\n".to_vec());
        let (object_type, size) = ObjectType::parse_header(&mut reader).unwrap();

        assert_eq!(object_type, ObjectType::Blob);
        assert_eq!(size, 6);
        assert_eq!(reader.position(), 7);
    }

    #[test]
    fn rejects_unknown_type() {
        let mut reader = Cursor::new(b"tag 3\0abc".to_vec());
        let err = ObjectType::parse_header(&mut reader).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<VcsError>(),
            Some(VcsError::BadObjectType(_))
        ));
    }

    #[test]
    fn rejects_truncated_header() {
        let mut reader = Cursor::new(b"blob 6".to_vec());
        let err = ObjectType::parse_header(&mut reader).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<VcsError>(),
            Some(VcsError::Corrupt(_))
        ));
    }
}
