//! A small catalog shaped like the published reference data for a handful of services.

use {crate::Catalog, lazy_static::lazy_static, std::str::FromStr};

pub(crate) const CATALOG_JSON: &str = r#"{
    "s3": {
        "name": "Amazon S3",
        "resource_types": [
            {"name": "bucket", "arn_pattern": "arn:${Partition}:s3:::${BucketName}"},
            {"name": "object", "arn_pattern": "arn:${Partition}:s3:::${BucketName}/${ObjectName}"}
        ],
        "condition_keys": [
            {"name": "s3:delimiter", "description": "Filters access by the delimiter parameter", "type": "String"},
            {"name": "s3:ExistingObjectTag/${TagKey}", "description": "Filters access by an existing object tag", "type": "String"},
            {"name": "s3:prefix", "description": "Filters access by key name prefix", "type": "String"},
            {"name": "s3:x-amz-server-side-encryption", "description": "Filters access by server-side encryption", "type": "String"}
        ],
        "actions": [
            {"name": "CreateBucket", "access_level": "Write", "resource_types": ["bucket*"]},
            {"name": "DeleteObject", "access_level": "Write", "resource_types": ["object*"]},
            {"name": "GetAccountPublicAccessBlock", "access_level": "Read"},
            {"name": "GetBucketLocation", "access_level": "Read", "resource_types": ["bucket*"]},
            {"name": "GetObject", "access_level": "Read", "resource_types": ["object*"],
             "condition_keys": ["s3:ExistingObjectTag/${TagKey}"]},
            {"name": "GetObjectAcl", "access_level": "Read", "resource_types": ["object*"]},
            {"name": "ListAllMyBuckets", "access_level": "List"},
            {"name": "ListBucket", "access_level": "List", "resource_types": ["bucket*"],
             "condition_keys": ["s3:delimiter", "s3:prefix"]},
            {"name": "PutAccountPublicAccessBlock", "access_level": "Permissions management"},
            {"name": "PutBucketPolicy", "access_level": "Permissions management", "resource_types": ["bucket*"]},
            {"name": "PutBucketTagging", "access_level": "Tagging", "resource_types": ["bucket*"]},
            {"name": "PutObject", "access_level": "Write", "resource_types": ["object*"],
             "condition_keys": ["s3:x-amz-server-side-encryption"]},
            {"name": "PutObjectTagging", "access_level": "Tagging", "resource_types": ["object*"],
             "condition_keys": ["s3:ExistingObjectTag/${TagKey}"]}
        ]
    },
    "ssm": {
        "name": "AWS Systems Manager",
        "resource_types": [
            {"name": "document", "arn_pattern": "arn:${Partition}:ssm:${Region}:${Account}:document/${DocumentName}"},
            {"name": "parameter", "arn_pattern": "arn:${Partition}:ssm:${Region}:${Account}:parameter/${ParameterNameWithoutLeadingSlash}",
             "condition_keys": ["aws:ResourceTag/${TagKey}", "ssm:resourceTag/${TagKey}"]}
        ],
        "condition_keys": [
            {"name": "ssm:Overwrite", "description": "Filters access by the Overwrite parameter", "type": "String"}
        ],
        "actions": [
            {"name": "AddTagsToResource", "access_level": "Tagging", "resource_types": ["document", "parameter"]},
            {"name": "DeleteParameter", "access_level": "Write", "resource_types": ["parameter*"]},
            {"name": "DescribeDocument", "access_level": "Read", "resource_types": ["document*"]},
            {"name": "DescribeParameters", "access_level": "List"},
            {"name": "GetParameter", "access_level": "Read", "resource_types": ["parameter*"]},
            {"name": "GetParameters", "access_level": "Read", "resource_types": ["parameter*"]},
            {"name": "GetParametersByPath", "access_level": "Read", "resource_types": ["parameter*"]},
            {"name": "PutParameter", "access_level": "Write", "resource_types": ["parameter*"],
             "condition_keys": ["ssm:Overwrite"], "dependent_actions": ["kms:Encrypt"]}
        ]
    },
    "iam": {
        "name": "AWS Identity and Access Management",
        "resource_types": [
            {"name": "user", "arn_pattern": "arn:${Partition}:iam::${Account}:user/${UserNameWithPath}",
             "condition_keys": ["aws:ResourceTag/${TagKey}"]},
            {"name": "role", "arn_pattern": "arn:${Partition}:iam::${Account}:role/${RoleNameWithPath}",
             "condition_keys": ["aws:ResourceTag/${TagKey}"]},
            {"name": "policy", "arn_pattern": "arn:${Partition}:iam::${Account}:policy/${PolicyNameWithPath}"}
        ],
        "condition_keys": [
            {"name": "iam:PassedToService", "description": "Filters access by the service the role is passed to", "type": "String"},
            {"name": "iam:PolicyARN", "description": "Filters access by the ARN of a managed policy", "type": "ARN"}
        ],
        "actions": [
            {"name": "AttachRolePolicy", "access_level": "Permissions management", "resource_types": ["role*"],
             "condition_keys": ["iam:PolicyARN"]},
            {"name": "CreatePolicy", "access_level": "Permissions management", "resource_types": ["policy*"]},
            {"name": "CreateRole", "access_level": "Write", "resource_types": ["role*"]},
            {"name": "GetAccountSummary", "access_level": "List"},
            {"name": "GetRole", "access_level": "Read", "resource_types": ["role*"]},
            {"name": "GetUser", "access_level": "Read", "resource_types": ["user*"]},
            {"name": "ListPolicies", "access_level": "List"},
            {"name": "ListRoles", "access_level": "List"},
            {"name": "ListUsers", "access_level": "List"},
            {"name": "PassRole", "access_level": "Write", "resource_types": ["role*"],
             "condition_keys": ["iam:PassedToService"]},
            {"name": "PutRolePolicy", "access_level": "Permissions management", "resource_types": ["role*"]},
            {"name": "TagRole", "access_level": "Tagging", "resource_types": ["role*"]}
        ]
    },
    "kms": {
        "name": "AWS Key Management Service",
        "resource_types": [
            {"name": "alias", "arn_pattern": "arn:${Partition}:kms:${Region}:${Account}:alias/${Alias}"},
            {"name": "key", "arn_pattern": "arn:${Partition}:kms:${Region}:${Account}:key/${KeyId}"}
        ],
        "condition_keys": [
            {"name": "kms:EncryptionContext:${EncryptionContextKey}", "description": "Filters access by the encryption context", "type": "String"},
            {"name": "kms:ViaService", "description": "Filters access by the calling service", "type": "String"}
        ],
        "actions": [
            {"name": "CreateKey", "access_level": "Write"},
            {"name": "Decrypt", "access_level": "Write", "resource_types": ["key*"],
             "condition_keys": ["kms:EncryptionContext:${EncryptionContextKey}", "kms:ViaService"]},
            {"name": "DescribeKey", "access_level": "Read", "resource_types": ["key*"]},
            {"name": "Encrypt", "access_level": "Write", "resource_types": ["key*"],
             "condition_keys": ["kms:EncryptionContext:${EncryptionContextKey}", "kms:ViaService"],
             "dependent_actions": ["kms:DescribeKey"]},
            {"name": "ListAliases", "access_level": "List"},
            {"name": "ListKeys", "access_level": "List"},
            {"name": "TagResource", "access_level": "Tagging", "resource_types": ["key*"]}
        ]
    },
    "service-x": {
        "resource_types": [
            {"name": "item", "arn_pattern": "arn:${Partition}:service-x:${Region}:${Account}:${Collection}/${ItemId}"},
            {"name": "resource-type-a", "arn_pattern": "arn:${Partition}:service-x:${Region}:${Account}:resource-type-a/${ResourceId}"}
        ],
        "actions": [
            {"name": "ListThings", "access_level": "List"},
            {"name": "ReadEverything", "access_level": "Read"},
            {"name": "ReadThing", "access_level": "Read", "resource_types": ["resource-type-a*"]},
            {"name": "TagItem", "access_level": "Tagging", "resource_types": ["item"]},
            {"name": "WriteItem", "access_level": "Write", "resource_types": ["item*"]}
        ]
    }
}"#;

lazy_static! {
    static ref CATALOG: Catalog = Catalog::from_str(CATALOG_JSON).unwrap();
}

pub(crate) fn catalog() -> &'static Catalog {
    &CATALOG
}
