use crate::{
    commands::{
        hashes::*, keys::*, lists::*, sets::*, sorted_sets::*, strings::*, Command, CommandError,
        StoreError,
    },
    key_value_store::KeyValueStore,
    resp::RespValue,
};

/// A parsed command that reads or writes the keyed store.
#[derive(Debug, Clone)]
pub enum StoreCommand {
    Get(GetArguments),
    Set(SetArguments),
    GetSet(GetSetArguments),
    MGet(MGetArguments),
    MSet(MSetArguments),
    IncrBy(IncrByArguments),
    Append(AppendArguments),
    Strlen(StrlenArguments),

    Push(PushArguments),
    Pop(PopArguments),
    Lrange(LrangeArguments),
    Llen(LlenArguments),
    Lindex(LindexArguments),
    Lset(LsetArguments),

    Sadd(SaddArguments),
    Srem(SremArguments),
    Smembers(SmembersArguments),
    Sismember(SismemberArguments),
    Scard(ScardArguments),

    Zadd(ZaddArguments),
    Zrem(ZremArguments),
    Zscore(ZscoreArguments),
    Zincrby(ZincrbyArguments),
    Zcard(ZcardArguments),
    Zrank(ZrankArguments),
    Zrange(ZrangeArguments),

    Hset(HsetArguments),
    Hget(HgetArguments),
    Hdel(HdelArguments),
    Hgetall(HgetallArguments),
    Hexists(HexistsArguments),
    Hlen(HlenArguments),
    Hincrby(HincrbyArguments),

    Del(DelArguments),
    Exists(ExistsArguments),
    Type(TypeArguments),
    Keys(KeysArguments),
    Expire(ExpireArguments),
    Ttl(TtlArguments),
    Persist(PersistArguments),
    Rename(RenameArguments),
    DbSize(DbSizeArguments),
    FlushDb(FlushDbArguments),
}

impl StoreCommand {
    /// Parses `command` if it names a store command. `Ok(None)` means the
    /// name belongs to something else (a control command or nothing at all).
    pub fn parse(command: &Command) -> Result<Option<Self>, CommandError> {
        let name = command.name.as_str();
        let arguments = command.arguments.as_slice();

        let parsed = match name {
            "GET" => StoreCommand::Get(GetArguments::parse(arguments)?),
            "SET" => StoreCommand::Set(SetArguments::parse(arguments)?),
            "GETSET" => StoreCommand::GetSet(GetSetArguments::parse(arguments)?),
            "MGET" => StoreCommand::MGet(MGetArguments::parse(arguments)?),
            "MSET" => StoreCommand::MSet(MSetArguments::parse(arguments)?),
            "INCR" | "DECR" | "INCRBY" | "DECRBY" => {
                StoreCommand::IncrBy(IncrByArguments::parse(name, arguments)?)
            }
            "APPEND" => StoreCommand::Append(AppendArguments::parse(arguments)?),
            "STRLEN" => StoreCommand::Strlen(StrlenArguments::parse(arguments)?),

            "LPUSH" => StoreCommand::Push(PushArguments::parse(name, arguments, ListEnd::Head)?),
            "RPUSH" => StoreCommand::Push(PushArguments::parse(name, arguments, ListEnd::Tail)?),
            "LPOP" => StoreCommand::Pop(PopArguments::parse(name, arguments, ListEnd::Head)?),
            "RPOP" => StoreCommand::Pop(PopArguments::parse(name, arguments, ListEnd::Tail)?),
            "LRANGE" => StoreCommand::Lrange(LrangeArguments::parse(arguments)?),
            "LLEN" => StoreCommand::Llen(LlenArguments::parse(arguments)?),
            "LINDEX" => StoreCommand::Lindex(LindexArguments::parse(arguments)?),
            "LSET" => StoreCommand::Lset(LsetArguments::parse(arguments)?),

            "SADD" => StoreCommand::Sadd(SaddArguments::parse(arguments)?),
            "SREM" => StoreCommand::Srem(SremArguments::parse(arguments)?),
            "SMEMBERS" => StoreCommand::Smembers(SmembersArguments::parse(arguments)?),
            "SISMEMBER" => StoreCommand::Sismember(SismemberArguments::parse(arguments)?),
            "SCARD" => StoreCommand::Scard(ScardArguments::parse(arguments)?),

            "ZADD" => StoreCommand::Zadd(ZaddArguments::parse(arguments)?),
            "ZREM" => StoreCommand::Zrem(ZremArguments::parse(arguments)?),
            "ZSCORE" => StoreCommand::Zscore(ZscoreArguments::parse(arguments)?),
            "ZINCRBY" => StoreCommand::Zincrby(ZincrbyArguments::parse(arguments)?),
            "ZCARD" => StoreCommand::Zcard(ZcardArguments::parse(arguments)?),
            "ZRANK" => StoreCommand::Zrank(ZrankArguments::parse(arguments)?),
            "ZRANGE" => StoreCommand::Zrange(ZrangeArguments::parse(name, arguments, false)?),
            "ZREVRANGE" => StoreCommand::Zrange(ZrangeArguments::parse(name, arguments, true)?),

            "HSET" => StoreCommand::Hset(HsetArguments::parse(arguments)?),
            "HGET" => StoreCommand::Hget(HgetArguments::parse(arguments)?),
            "HDEL" => StoreCommand::Hdel(HdelArguments::parse(arguments)?),
            "HGETALL" => StoreCommand::Hgetall(HgetallArguments::parse(arguments)?),
            "HEXISTS" => StoreCommand::Hexists(HexistsArguments::parse(arguments)?),
            "HLEN" => StoreCommand::Hlen(HlenArguments::parse(arguments)?),
            "HINCRBY" => StoreCommand::Hincrby(HincrbyArguments::parse(arguments)?),

            "DEL" => StoreCommand::Del(DelArguments::parse(arguments)?),
            "EXISTS" => StoreCommand::Exists(ExistsArguments::parse(arguments)?),
            "TYPE" => StoreCommand::Type(TypeArguments::parse(arguments)?),
            "KEYS" => StoreCommand::Keys(KeysArguments::parse(arguments)?),
            "EXPIRE" => StoreCommand::Expire(ExpireArguments::parse(name, arguments, 1000)?),
            "PEXPIRE" => StoreCommand::Expire(ExpireArguments::parse(name, arguments, 1)?),
            "TTL" => StoreCommand::Ttl(TtlArguments::parse(name, arguments, false)?),
            "PTTL" => StoreCommand::Ttl(TtlArguments::parse(name, arguments, true)?),
            "PERSIST" => StoreCommand::Persist(PersistArguments::parse(arguments)?),
            "RENAME" => StoreCommand::Rename(RenameArguments::parse(arguments)?),
            "DBSIZE" => StoreCommand::DbSize(DbSizeArguments::parse(arguments)?),
            "FLUSHDB" => StoreCommand::FlushDb(FlushDbArguments::parse(arguments)?),

            _ => return Ok(None),
        };

        Ok(Some(parsed))
    }

    pub fn apply(&self, store: &mut KeyValueStore) -> Result<RespValue, StoreError> {
        match self {
            StoreCommand::Get(arguments) => arguments.apply(store),
            StoreCommand::Set(arguments) => arguments.apply(store),
            StoreCommand::GetSet(arguments) => arguments.apply(store),
            StoreCommand::MGet(arguments) => arguments.apply(store),
            StoreCommand::MSet(arguments) => arguments.apply(store),
            StoreCommand::IncrBy(arguments) => arguments.apply(store),
            StoreCommand::Append(arguments) => arguments.apply(store),
            StoreCommand::Strlen(arguments) => arguments.apply(store),

            StoreCommand::Push(arguments) => arguments.apply(store),
            StoreCommand::Pop(arguments) => arguments.apply(store),
            StoreCommand::Lrange(arguments) => arguments.apply(store),
            StoreCommand::Llen(arguments) => arguments.apply(store),
            StoreCommand::Lindex(arguments) => arguments.apply(store),
            StoreCommand::Lset(arguments) => arguments.apply(store),

            StoreCommand::Sadd(arguments) => arguments.apply(store),
            StoreCommand::Srem(arguments) => arguments.apply(store),
            StoreCommand::Smembers(arguments) => arguments.apply(store),
            StoreCommand::Sismember(arguments) => arguments.apply(store),
            StoreCommand::Scard(arguments) => arguments.apply(store),

            StoreCommand::Zadd(arguments) => arguments.apply(store),
            StoreCommand::Zrem(arguments) => arguments.apply(store),
            StoreCommand::Zscore(arguments) => arguments.apply(store),
            StoreCommand::Zincrby(arguments) => arguments.apply(store),
            StoreCommand::Zcard(arguments) => arguments.apply(store),
            StoreCommand::Zrank(arguments) => arguments.apply(store),
            StoreCommand::Zrange(arguments) => arguments.apply(store),

            StoreCommand::Hset(arguments) => arguments.apply(store),
            StoreCommand::Hget(arguments) => arguments.apply(store),
            StoreCommand::Hdel(arguments) => arguments.apply(store),
            StoreCommand::Hgetall(arguments) => arguments.apply(store),
            StoreCommand::Hexists(arguments) => arguments.apply(store),
            StoreCommand::Hlen(arguments) => arguments.apply(store),
            StoreCommand::Hincrby(arguments) => arguments.apply(store),

            StoreCommand::Del(arguments) => arguments.apply(store),
            StoreCommand::Exists(arguments) => arguments.apply(store),
            StoreCommand::Type(arguments) => arguments.apply(store),
            StoreCommand::Keys(arguments) => arguments.apply(store),
            StoreCommand::Expire(arguments) => arguments.apply(store),
            StoreCommand::Ttl(arguments) => arguments.apply(store),
            StoreCommand::Persist(arguments) => arguments.apply(store),
            StoreCommand::Rename(arguments) => arguments.apply(store),
            StoreCommand::DbSize(arguments) => arguments.apply(store),
            StoreCommand::FlushDb(arguments) => arguments.apply(store),
        }
    }

    /// Parses and applies `command`, folding store failures into a RESP
    /// error reply.
    pub fn execute(command: &Command, store: &mut KeyValueStore) -> Option<RespValue> {
        let reply = match Self::parse(command) {
            Ok(Some(parsed)) => parsed
                .apply(store)
                .unwrap_or_else(|err| CommandError::from(err).to_resp()),
            Ok(None) => return None,
            Err(err) => err.to_resp(),
        };

        Some(reply)
    }
}
