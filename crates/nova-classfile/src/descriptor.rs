use crate::error::{Error, Result};

/// JVM base types as they appear in field and method descriptors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseType {
    Byte,
    Char,
    Double,
    Float,
    Int,
    Long,
    Short,
    Boolean,
}

impl BaseType {
    pub fn from_descriptor_char(ch: u8) -> Option<Self> {
        Some(match ch {
            b'B' => BaseType::Byte,
            b'C' => BaseType::Char,
            b'D' => BaseType::Double,
            b'F' => BaseType::Float,
            b'I' => BaseType::Int,
            b'J' => BaseType::Long,
            b'S' => BaseType::Short,
            b'Z' => BaseType::Boolean,
            _ => return None,
        })
    }

    pub fn descriptor_char(self) -> char {
        match self {
            BaseType::Byte => 'B',
            BaseType::Char => 'C',
            BaseType::Double => 'D',
            BaseType::Float => 'F',
            BaseType::Int => 'I',
            BaseType::Long => 'J',
            BaseType::Short => 'S',
            BaseType::Boolean => 'Z',
        }
    }

    /// The Java keyword naming this type (`int`, `boolean`, ...).
    pub fn keyword(self) -> &'static str {
        match self {
            BaseType::Byte => "byte",
            BaseType::Char => "char",
            BaseType::Double => "double",
            BaseType::Float => "float",
            BaseType::Int => "int",
            BaseType::Long => "long",
            BaseType::Short => "short",
            BaseType::Boolean => "boolean",
        }
    }
}

/// A parsed field type. Object types carry the *binary* name (`java.lang.String`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldType {
    Base(BaseType),
    Object(String),
    Array(Box<FieldType>),
}

impl FieldType {
    /// Number of array dimensions wrapping the element type (0 for non-arrays).
    pub fn dimensions(&self) -> usize {
        let mut dims = 0;
        let mut current = self;
        while let FieldType::Array(inner) = current {
            dims += 1;
            current = inner;
        }
        dims
    }

    /// The innermost non-array type.
    pub fn element(&self) -> &FieldType {
        let mut current = self;
        while let FieldType::Array(inner) = current {
            current = inner;
        }
        current
    }

    /// Binary name of the class this type refers to, looking through array dimensions.
    pub fn class_name(&self) -> Option<&str> {
        match self.element() {
            FieldType::Object(name) => Some(name),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReturnType {
    Void,
    Type(FieldType),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDescriptor {
    pub params: Vec<FieldType>,
    pub return_type: ReturnType,
}

impl MethodDescriptor {
    /// Binary names of every class mentioned by the parameters or return type.
    pub fn class_names(&self) -> impl Iterator<Item = &str> {
        let ret = match &self.return_type {
            ReturnType::Void => None,
            ReturnType::Type(ty) => ty.class_name(),
        };
        self.params.iter().filter_map(FieldType::class_name).chain(ret)
    }
}

pub fn internal_to_binary(internal: &str) -> String {
    internal.replace('/', ".")
}

pub fn binary_to_internal(binary: &str) -> String {
    binary.replace('.', "/")
}

/// Parse a field descriptor such as `I` or `[Ljava/lang/String;`.
pub fn parse_field_descriptor(desc: &str) -> Result<FieldType> {
    let mut cursor = Cursor::new(desc);
    let ty = cursor.field_type()?;
    cursor.finish()?;
    Ok(ty)
}

/// Parse a method descriptor such as `(ILjava/lang/String;)V`.
pub fn parse_method_descriptor(desc: &str) -> Result<MethodDescriptor> {
    let mut cursor = Cursor::new(desc);
    cursor.expect(b'(')?;

    let mut params = Vec::new();
    while cursor.peek() != Some(b')') {
        params.push(cursor.field_type()?);
    }
    cursor.expect(b')')?;

    let return_type = if cursor.peek() == Some(b'V') {
        cursor.pos += 1;
        ReturnType::Void
    } else {
        ReturnType::Type(cursor.field_type()?)
    };
    cursor.finish()?;

    Ok(MethodDescriptor {
        params,
        return_type,
    })
}

/// Parse a JVM array class name in binary form (`[I`, `[[Ljava.lang.String;`), as accepted by
/// class-name lookups. Returns `None` if `name` does not start with `[`.
pub fn parse_array_class_name(name: &str) -> Option<Result<FieldType>> {
    if !name.starts_with('[') {
        return None;
    }
    Some(parse_field_descriptor(&binary_to_internal(name)))
}

struct Cursor<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn invalid(&self) -> Error {
        Error::InvalidDescriptor(self.input.to_string())
    }

    fn peek(&self) -> Option<u8> {
        self.input.as_bytes().get(self.pos).copied()
    }

    fn expect(&mut self, byte: u8) -> Result<()> {
        if self.peek() != Some(byte) {
            return Err(self.invalid());
        }
        self.pos += 1;
        Ok(())
    }

    fn finish(&self) -> Result<()> {
        if self.pos != self.input.len() {
            return Err(self.invalid());
        }
        Ok(())
    }

    fn field_type(&mut self) -> Result<FieldType> {
        let Some(head) = self.peek() else {
            return Err(self.invalid());
        };
        self.pos += 1;

        if let Some(base) = BaseType::from_descriptor_char(head) {
            return Ok(FieldType::Base(base));
        }

        match head {
            b'L' => {
                let rest = &self.input[self.pos..];
                let end = rest.find(';').ok_or_else(|| self.invalid())?;
                let internal = &rest[..end];
                if internal.is_empty() || internal.contains(['.', '[', '(']) {
                    return Err(self.invalid());
                }
                self.pos += end + 1;
                Ok(FieldType::Object(internal_to_binary(internal)))
            }
            b'[' => Ok(FieldType::Array(Box::new(self.field_type()?))),
            _ => Err(self.invalid()),
        }
    }
}
